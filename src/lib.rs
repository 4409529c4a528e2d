//! powerpack - robotics visualization panel core
//!
//! Host-independent logic behind a set of visualization panels: raw sensor
//! image decoding, 2D detection overlays, and keyboard teleoperation with
//! velocity and camera pose commands.

pub mod config;
pub mod constants;
pub mod detection;
pub mod panel;
pub mod raw_image;
pub mod teleop;
