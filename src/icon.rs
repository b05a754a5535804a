use anyhow::Context;
use std::path::Path;

/// Raw RGBA pixels for window and tray icons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPixels {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub fn load_icon(path: &Path) -> anyhow::Result<IconPixels> {
    let img = image::open(path)
        .with_context(|| format!("loading icon {}", path.display()))?
        .into_rgba8();
    let (width, height) = img.dimensions();
    Ok(IconPixels {
        rgba: img.into_raw(),
        width,
        height,
    })
}

/// Square of `outer` with a centred square of `inner` half its size.
pub fn fallback_icon(size: u32, outer: [u8; 3], inner: [u8; 3]) -> IconPixels {
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    let (lo, hi) = (size / 4, size * 3 / 4);
    for y in 0..size {
        for x in 0..size {
            let centre = (lo..hi).contains(&x) && (lo..hi).contains(&y);
            let [r, g, b] = if centre { inner } else { outer };
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    IconPixels {
        rgba,
        width: size,
        height: size,
    }
}

/// Icon at `path`, or the purple/green fallback when it cannot be read.
pub fn load_icon_or_fallback(path: &Path) -> IconPixels {
    load_icon(path).unwrap_or_else(|e| {
        tracing::warn!(error = %format!("{e:#}"), "using generated icon");
        fallback_icon(64, [128, 0, 128], [0, 128, 0])
    })
}
