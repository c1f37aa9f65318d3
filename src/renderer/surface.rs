//! Render surfaces
//!
//! A surface takes finished frames and puts them somewhere: a GPU swapchain
//! on the web build, or memory for headless runs and tests.

use super::frame::Frame;
use crate::error::SurfaceError;

/// Destination for rendered frames
pub trait RenderSurface {
    /// Reconfigure for a new pixel size
    fn resize(&mut self, width: u32, height: u32);

    /// Present one frame
    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError>;

    /// Release GPU/canvas resources. Called once, from `Engine::cleanup`.
    fn release(&mut self);
}

/// Surface that keeps the most recent frame in memory
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    pub size: (u32, u32),
    last_frame: Option<Frame>,
    frames_presented: u64,
    released: bool,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl RenderSurface for HeadlessSurface {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
        }
    }

    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Other("surface released".to_string()));
        }
        self.last_frame = Some(frame.clone());
        self.frames_presented += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
        self.last_frame = None;
    }
}
