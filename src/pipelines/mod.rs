// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines for photo capture
//!
//! Heavy work (decoding, rotation, cropping, JPEG encoding, disk writes)
//! runs on tokio's blocking pool so the caller's executor stays responsive
//! while a capture is in flight.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  JPEG File   │
//! │ (JPEG bytes) │     │  - Decode         │     │              │
//! │              │     │  - Rotate 90° CW  │     │              │
//! │              │     │  - Centered crop  │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```

pub mod photo;
