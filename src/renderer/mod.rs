use glam::{Vec2, vec2};
use wgpu::{Color, TextureFormat};

mod cube;
mod renderer;
mod text;

pub use renderer::*;

const FOV_DEGREES: f32 = 45.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 50.0;
const CAMERA_DISTANCE: f32 = 10.0;
const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const CLEAR_COLOR: Color = Color {
    r: 0.8,
    g: 0.8,
    b: 0.8,
    a: 1.0,
};

const TEXT_SCALE: f32 = 3.0;
const LABEL_ORIGIN: Vec2 = vec2(10.0, 10.0);
const LABEL_STRIDE: f32 = 40.0;
const GLYPH_CAP: usize = 64;
