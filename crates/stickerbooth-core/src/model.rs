//! The sticker model: ordered sticker instances plus the base-image reference.
//!
//! Array order is paint order. Every operation is total: unknown ids are
//! ignored, out-of-range sizes are clamped, and rotation is wrapped, so the
//! model upholds its invariants no matter what the caller sends.
//!
//! Each effective mutation bumps [`StickerModel::version`], which the editor
//! uses to decide when a new frame is needed.

use crate::config::CanvasConfig;
use crate::geometry::Point;
use crate::sticker::{normalize_rotation, StickerId, StickerInstance, StickerPatch, StickerSource};

/// Ordered collection of placed stickers and the current base image.
#[derive(Debug, Clone)]
pub struct StickerModel {
    stickers: Vec<StickerInstance>,
    base_image: Option<String>,
    next_id: u64,
    version: u64,
    default_size: f64,
    min_size: f64,
    fallback_position: Point,
}

impl StickerModel {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            stickers: Vec::new(),
            base_image: None,
            next_id: 1,
            version: 0,
            default_size: config.default_sticker_size,
            min_size: config.min_sticker_size,
            fallback_position: config.fallback_position,
        }
    }

    /// Append a sticker with default size and no rotation.
    ///
    /// A missing or non-finite `position` falls back to the configured point.
    pub fn add(&mut self, source: StickerSource, position: Option<Point>) -> StickerId {
        let position = position
            .filter(|p| p.is_finite())
            .unwrap_or(self.fallback_position);
        let id = StickerId(self.next_id);
        self.next_id += 1;

        self.stickers.push(StickerInstance {
            id,
            source,
            x: position.x,
            y: position.y,
            width: self.default_size,
            height: self.default_size,
            rotation: 0.0,
        });
        self.bump();
        log::debug!("added {id} at ({}, {})", position.x, position.y);
        id
    }

    /// Merge `patch` into the sticker with `id`.
    ///
    /// Sizes are clamped to the floor, rotation is wrapped into `[0, 360)` and
    /// non-finite values are skipped. Returns `false` when `id` is unknown.
    pub fn update(&mut self, id: StickerId, patch: &StickerPatch) -> bool {
        let min = self.min_size;
        let Some(sticker) = self.stickers.iter_mut().find(|s| s.id == id) else {
            return false;
        };

        let before = (sticker.x, sticker.y, sticker.width, sticker.height, sticker.rotation);
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        if let Some(x) = finite(patch.x) {
            sticker.x = x;
        }
        if let Some(y) = finite(patch.y) {
            sticker.y = y;
        }
        if let Some(w) = finite(patch.width) {
            sticker.width = w.max(min);
        }
        if let Some(h) = finite(patch.height) {
            sticker.height = h.max(min);
        }
        if let Some(r) = finite(patch.rotation) {
            sticker.rotation = normalize_rotation(r);
        }
        let after = (sticker.x, sticker.y, sticker.width, sticker.height, sticker.rotation);
        if after != before {
            self.bump();
        }
        true
    }

    /// Remove the sticker with `id`, returning it if it was present.
    pub fn delete(&mut self, id: StickerId) -> Option<StickerInstance> {
        let index = self.stickers.iter().position(|s| s.id == id)?;
        let removed = self.stickers.remove(index);
        self.bump();
        log::debug!("deleted {id}");
        Some(removed)
    }

    /// Drop every sticker and the base image. Ids keep counting up.
    pub fn reset(&mut self) {
        self.stickers.clear();
        self.base_image = None;
        self.bump();
        log::debug!("model reset");
    }

    /// Set (or replace) the base image by asset key.
    pub fn set_base_image(&mut self, key: impl Into<String>) {
        self.base_image = Some(key.into());
        self.bump();
    }

    pub fn base_image(&self) -> Option<&str> {
        self.base_image.as_deref()
    }

    pub fn get(&self, id: StickerId) -> Option<&StickerInstance> {
        self.stickers.iter().find(|s| s.id == id)
    }

    /// Stickers in paint order (bottom first).
    pub fn stickers(&self) -> &[StickerInstance] {
        &self.stickers
    }

    /// Topmost sticker whose unrotated box contains `p`.
    pub fn hit_test(&self, p: Point) -> Option<&StickerInstance> {
        self.stickers.iter().rev().find(|s| s.rect().contains(p))
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Monotonic counter of effective mutations.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

impl Default for StickerModel {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone)]
    enum Op {
        Add(Option<(f64, f64)>),
        Update(usize, StickerPatch),
        Delete(usize),
        Reset,
    }

    fn value_strategy() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            Just(None),
            (-1000.0f64..1000.0).prop_map(Some),
            Just(Some(f64::NAN)),
            Just(Some(-0.0)),
        ]
    }

    fn patch_strategy() -> impl Strategy<Value = StickerPatch> {
        (
            value_strategy(),
            value_strategy(),
            value_strategy(),
            value_strategy(),
            value_strategy(),
        )
            .prop_map(|(x, y, width, height, rotation)| StickerPatch {
                x,
                y,
                width,
                height,
                rotation,
            })
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => proptest::option::of((-100.0f64..700.0, -100.0f64..700.0)).prop_map(Op::Add),
            4 => (0usize..8, patch_strategy()).prop_map(|(i, p)| Op::Update(i, p)),
            2 => (0usize..8).prop_map(Op::Delete),
            1 => Just(Op::Reset),
        ]
    }

    /// Resolve an index against the live stickers, or an id nobody holds.
    fn pick(model: &StickerModel, i: usize) -> StickerId {
        model
            .stickers()
            .get(i)
            .map(|s| s.id)
            .unwrap_or(StickerId(u64::MAX - i as u64))
    }

    proptest! {
        /// Property: ids stay unique and every sticker satisfies the size and
        /// rotation invariants after any operation sequence.
        #[test]
        fn prop_invariants_hold(ops in proptest::collection::vec(op_strategy(), 0..60)) {
            let mut model = StickerModel::default();
            for op in ops {
                match op {
                    Op::Add(pos) => {
                        model.add(StickerSource::parse("/a.png"), pos.map(|(x, y)| Point::new(x, y)));
                    }
                    Op::Update(i, patch) => {
                        let id = pick(&model, i);
                        model.update(id, &patch);
                    }
                    Op::Delete(i) => {
                        let id = pick(&model, i);
                        model.delete(id);
                    }
                    Op::Reset => model.reset(),
                }

                let mut seen = HashSet::new();
                for s in model.stickers() {
                    prop_assert!(seen.insert(s.id), "duplicate id {}", s.id);
                    prop_assert!(s.width >= 20.0, "width {}", s.width);
                    prop_assert!(s.height >= 20.0, "height {}", s.height);
                    prop_assert!((0.0..360.0).contains(&s.rotation), "rotation {}", s.rotation);
                }
            }
        }

        /// Property: eight 45° steps return to the starting angle.
        #[test]
        fn prop_full_turn_is_identity(start in 0.0f64..360.0) {
            let mut model = StickerModel::default();
            let id = model.add(StickerSource::parse("/a.png"), None);
            model.update(id, &StickerPatch::rotation(start));
            let original = model.get(id).unwrap().rotation;
            for _ in 0..8 {
                let r = model.get(id).unwrap().rotation;
                model.update(id, &StickerPatch::rotation(r + 45.0));
            }
            let back = model.get(id).unwrap().rotation;
            let diff = (back - original).abs();
            prop_assert!(diff < 1e-9 || (360.0 - diff) < 1e-9, "{} vs {}", back, original);
        }

        /// Property: reset always leaves an empty model without a base image.
        #[test]
        fn prop_reset_empties(count in 0usize..20, with_base in any::<bool>()) {
            let mut model = StickerModel::default();
            for _ in 0..count {
                model.add(StickerSource::parse("🎉"), None);
            }
            if with_base {
                model.set_base_image("upload-1");
            }
            model.reset();
            prop_assert!(model.is_empty());
            prop_assert!(model.base_image().is_none());
        }
    }
}
