/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use spinlab_core::projection::project_to_screen;
use spinlab_core::{Mesh, Triangle};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light that faces never fall below, so back-lit faces stay visible
const AMBIENT: f32 = 0.25;

/// Background color cells are reset to every frame
pub const CLEAR_COLOR: [f32; 3] = [0.2, 0.3, 0.3];

/// Fixed-function state applied while rasterizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterState {
    /// Keep the nearest fragment per cell; otherwise later draws win
    pub depth_test: bool,
    /// Mix fragment colors into the cell by their alpha
    pub blend: bool,
}

impl Default for RasterState {
    fn default() -> Self {
        Self {
            depth_test: true,
            blend: false,
        }
    }
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    state: RasterState,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<[f32; 3]>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, state: RasterState) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            state,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![CLEAR_COLOR; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.state);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(CLEAR_COLOR);
    }

    /// Character and color currently stored for a cell
    pub fn cell(&self, x: usize, y: usize) -> Option<(char, [f32; 3])> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.char_buffer[idx], self.color_buffer[idx]))
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
    ) {
        let mvp = view_projection * model;
        for triangle in mesh.triangles() {
            self.render_triangle(&triangle, model, &mvp);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model: &Matrix4<f32>, mvp: &Matrix4<f32>) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match project_to_screen(&vertex.position, mvp, self.width as u32, self.height as u32) {
                Some(projected) => *coord = projected,
                None => return, // Triangle is clipped
            }
        }

        // Shade with the face normal in world space, lit from the viewer
        let normal = model.transform_vector(&triangle.calculate_normal()).normalize();
        let light_dir = Vector3::new(0.0, 0.0, 1.0);
        let brightness = AMBIENT + (1.0 - AMBIENT) * normal.dot(&light_dir).max(0.0);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        let colors = triangle.vertices.map(|v| {
            let [r, g, b, a] = v.color;
            [r * brightness, g * brightness, b * brightness, a]
        });

        self.rasterize_triangle(&screen_coords, &colors, character);
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[(f32, f32, f32); 3],
        colors: &[[f32; 4]; 3],
        character: char,
    ) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let idx = y as usize * self.width + x as usize;
                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                if self.state.depth_test {
                    if depth >= self.depth_buffer[idx] {
                        continue;
                    }
                    self.depth_buffer[idx] = depth;
                }

                let mut fragment = [0.0f32; 4];
                for (channel, value) in fragment.iter_mut().enumerate() {
                    *value = w0 * colors[0][channel]
                        + w1 * colors[1][channel]
                        + w2 * colors[2][channel];
                }

                let dst = &mut self.color_buffer[idx];
                let alpha = if self.state.blend { fragment[3].clamp(0.0, 1.0) } else { 1.0 };
                for channel in 0..3 {
                    dst[channel] = fragment[channel] * alpha + dst[channel] * (1.0 - alpha);
                }
                self.char_buffer[idx] = character;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = to_terminal_color(self.color_buffer[idx]);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_terminal_color([r, g, b]: [f32; 3]) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
