use serde::{Deserialize, Serialize};

/// One canvas region a thumbnail may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub size: u32,
    pub position: (u32, u32),
}

/// Where a label is drawn and how large.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub origin: (i32, i32),
    pub size: f32,
}

/// Layout and tuning values for a cover composition.
///
/// Slot sizes and positions are kept as two independent tables. The number of
/// slots in use is the smallest of the two table lengths and the number of
/// supplied sources, so a mismatch between them never indexes out of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverConfig {
    pub canvas_size: u32,
    pub sample_size: u32,
    pub slot_sizes: Vec<u32>,
    pub slot_positions: Vec<(u32, u32)>,
    pub large_label: LabelStyle,
    pub small_label: LabelStyle,
    pub clusters: usize,
    pub kmeans_restarts: usize,
    pub kmeans_threshold: f64,
    pub jpeg_quality: u8,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            canvas_size: 500,
            sample_size: 150,
            slot_sizes: vec![230, 190, 150],
            slot_positions: vec![(25, 216), (195, 236), (325, 256)],
            large_label: LabelStyle {
                origin: (10, 10),
                size: 75.0,
            },
            small_label: LabelStyle {
                origin: (10, 112),
                size: 39.0,
            },
            clusters: 5,
            kmeans_restarts: 20,
            kmeans_threshold: 1e-5,
            jpeg_quality: 75,
        }
    }
}

impl CoverConfig {
    /// Number of slots filled for `supplied` sources.
    pub fn slots_used(&self, supplied: usize) -> usize {
        supplied
            .min(self.slot_sizes.len())
            .min(self.slot_positions.len())
    }

    /// Slot at `index` in front-to-back priority order (0 is drawn on top).
    pub fn slot(&self, index: usize) -> Option<Slot> {
        let size = *self.slot_sizes.get(index)?;
        let position = *self.slot_positions.get(index)?;
        Some(Slot { size, position })
    }
}

/// Scaled size and centering offset of a thumbnail inside its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Fits a `width` x `height` image into a square slot of `slot_size`.
///
/// The longer side maps onto the slot size, the shorter side scales
/// proportionally and is centered on its own axis.
pub fn fit_to_slot(width: u32, height: u32, slot_size: u32) -> Placement {
    let size = slot_size as f64;
    if width > height {
        let scaled = height as f64 * size / width as f64;
        Placement {
            width: slot_size,
            height: (scaled as u32).max(1),
            offset_x: 0,
            offset_y: ((size - scaled) / 2.0) as u32,
        }
    } else if height > width {
        let scaled = width as f64 * size / height as f64;
        Placement {
            width: (scaled as u32).max(1),
            height: slot_size,
            offset_x: ((size - scaled) / 2.0) as u32,
            offset_y: 0,
        }
    } else {
        Placement {
            width: slot_size,
            height: slot_size,
            offset_x: 0,
            offset_y: 0,
        }
    }
}
