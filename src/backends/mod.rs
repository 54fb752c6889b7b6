// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for camera access
//!
//! The backend layer hides the capture device behind one trait so the
//! capture pipeline stays the same for any source:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Capture Orchestrator               │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │  CameraSession   │  │   Resolution    │  │
//! │  │  (lifecycle)     │  │   selection     │  │
//! │  └──────────────────┘  └─────────────────┘  │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  FileSourceBackend (virtual camera)  │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Backend trait, session, size selection and the file-backed camera

pub mod camera;
