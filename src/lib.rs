//! # image-conv
//!
//! Load one raster image, pick a target size and output format, resize it,
//! and save the result. The library holds the whole conversion workflow; the
//! `image-conv` binary is a thin command-line driver over it.
//!
//! # Workflow
//!
//! ```text
//! select file → decode → edit width/height/format → resize → download
//!                  ▲                                            │
//!                  └──────────────── reset ─────────────────────┘
//! ```
//!
//! All state lives in a [`session::Session`] value. Each user action is an
//! [`session::Event`]; handling it returns the next session plus an optional
//! notice and download. Nothing is global, so a session can be driven from a
//! CLI, a test, or any other front end.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Session state machine: load generations, linked dimension fields, resize, download, reset |
//! | [`imaging`] | Dimension math, format resolution, decode/resize/encode backend |
//! | [`types`] | The decoded source image and the encoded resize artifact |
//! | [`config`] | `image-conv.toml` loading: presets, render settings, output directory |
//! | [`output`] | Display formatting for metadata, notices, presets and resize reports |
//!
//! # Design Decisions
//!
//! ## Fields Stay Text
//!
//! Width and height are stored exactly as typed. They are parsed when a
//! linked value is derived and again when a resize is requested, so a half
//! typed value never gets rewritten under the user.
//!
//! ## Last Selection Wins
//!
//! Decoding is asynchronous from the session's point of view. Every file
//! selection opens a new load generation and decode results carry the
//! generation they were started for. Results from older generations are
//! dropped, so a slow decode can never overwrite a newer file.
//!
//! ## Composite Before Encode
//!
//! The resized image is drawn over a solid backdrop before encoding. JPEG has
//! no alpha channel; compositing first keeps transparent regions a known
//! colour instead of whatever the encoder picks.

pub mod config;
pub mod imaging;
pub mod output;
pub mod session;
pub mod types;
