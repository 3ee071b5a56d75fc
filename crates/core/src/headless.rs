//! Headless host collaborators.
//!
//! Stand-ins for the windowed host: a title-recording window, a device that
//! logs its calls, a loading screen that paints the splash color. Used by
//! the CLI host and throughout the test suites.

use tracing::info;

use crate::host::{
    AnalyticsSink, GraphicsDevice, HostWindow, LoadingScreen, RenderInstance, Splash,
};

/// Window without a surface. Remembers the last title it was given.
pub struct HeadlessWindow {
    title: String,
    size: (u32, u32),
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            title: String::new(),
            size: (width, height),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl HostWindow for HeadlessWindow {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn inner_size(&self) -> (u32, u32) {
        self.size
    }
}

/// One recorded graphics-device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOp {
    Clear([f32; 4]),
    Instances(usize),
    Present,
}

/// Device that records calls instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    ops: Vec<DeviceOp>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DeviceOp] {
        &self.ops
    }

    /// Drains the recorded calls.
    pub fn take_ops(&mut self) -> Vec<DeviceOp> {
        std::mem::take(&mut self.ops)
    }
}

impl GraphicsDevice for RecordingDevice {
    fn clear(&mut self, color: [f32; 4]) {
        self.ops.push(DeviceOp::Clear(color));
    }

    fn draw_instances(&mut self, instances: &[RenderInstance]) {
        self.ops.push(DeviceOp::Instances(instances.len()));
    }

    fn present(&mut self) {
        self.ops.push(DeviceOp::Present);
    }
}

/// Loading screen that fills the frame with the splash color.
#[derive(Debug, Default)]
pub struct SolidLoadingScreen;

impl LoadingScreen for SolidLoadingScreen {
    fn render_early(&mut self, device: &mut dyn GraphicsDevice, splash: &Splash) {
        device.clear(splash.color);
    }
}

/// Analytics sink that reports through the log stream.
#[derive(Debug, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn game_started(&mut self, world: &str) {
        info!(world, "game started");
    }
}
