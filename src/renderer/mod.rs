mod color;

pub use color::{map_to_rgba, ColorMap};

use crate::state::FrameSnapshot;

/// Paint the scalar field into an RGBA buffer of `width * height` pixels,
/// stretched to fill it. Each cell becomes a solid block (nearest-neighbour);
/// grid row N is drawn at the top.
pub fn render_into(buf: &mut Vec<u8>, snap: &FrameSnapshot, width: usize, height: usize, colormap: ColorMap) {
    buf.resize(width * height * 4, 0);
    let n = snap.n;
    if n == 0 || width == 0 || height == 0 {
        buf.fill(0);
        return;
    }

    // Grid column for every screen column
    let cols: Vec<usize> = (0..width).map(|x| (x * n / width).min(n - 1) + 1).collect();

    for y in 0..height {
        let j = n - (y * n / height).min(n - 1);
        let row_off = y * width * 4;
        for (x, &i) in cols.iter().enumerate() {
            let rgba = map_to_rgba(snap.at(i, j), colormap);
            let off = row_off + x * 4;
            buf[off..off + 4].copy_from_slice(&rgba);
        }
    }
}

pub fn render(snap: &FrameSnapshot, width: usize, height: usize, colormap: ColorMap) -> Vec<u8> {
    let mut buf = Vec::new();
    render_into(&mut buf, snap, width, height, colormap);
    buf
}

/// Convert RGBA &[u8] buffer to 0RGB &[u32] buffer for minifb.
pub fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (px, pixel) in out.iter_mut().zip(rgba.chunks_exact(4)) {
        *px = (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32;
    }
}
