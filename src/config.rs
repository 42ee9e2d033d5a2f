use clap::Parser;

/// Visualizes accelerometer tilt streamed over a serial port as a rotating
/// 3D cube.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Config {
    /// Serial device the sensor board is attached to, e.g. /dev/ttyUSB0 or COM3.
    pub port: String,

    /// Transport symbol rate; must match the firmware.
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Samples in the moving-average window.
    #[arg(long, default_value_t = 8)]
    pub smoothing_window: usize,

    /// Degrees of cube rotation per unit of averaged acceleration.
    #[arg(long, default_value_t = 5.0)]
    pub rotation_scale: f32,
}
