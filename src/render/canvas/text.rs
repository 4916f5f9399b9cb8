//! Cached text measurement over a Canvas 2D context.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use web_sys::CanvasRenderingContext2d;

use crate::grid::TextMeasure;

pub(super) const TEXT_MEASURE_CACHE_CAP: usize = 4096;

/// Bounded FIFO cache of text widths keyed by font and text.
pub(super) struct TextMeasureCache {
    entries: HashMap<Rc<str>, f64>,
    order: VecDeque<Rc<str>>,
    max_entries: usize,
    scratch: String,
}

impl TextMeasureCache {
    pub(super) fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            scratch: String::new(),
        }
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn get(&mut self, font: &str, text: &str) -> Option<f64> {
        if self.max_entries == 0 {
            return None;
        }
        let key = Self::build_key(&mut self.scratch, font, text);
        self.entries.get(key).copied()
    }

    fn insert(&mut self, font: &str, text: &str, width: f64) {
        if self.max_entries == 0 {
            return;
        }
        let key = Self::build_key(&mut self.scratch, font, text);
        if self.entries.contains_key(key) {
            return;
        }
        let key_rc: Rc<str> = key.into();
        self.entries.insert(Rc::clone(&key_rc), width);
        self.order.push_back(key_rc);
        while self.entries.len() > self.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    /// Width of `text` in `font`. Leaves `font` set on the context.
    pub(super) fn measure(
        &mut self,
        ctx: &CanvasRenderingContext2d,
        font: &str,
        text: &str,
    ) -> f64 {
        if let Some(width) = self.get(font, text) {
            return width;
        }
        ctx.set_font(font);
        let width = ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);
        self.insert(font, text, width);
        width
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn build_key<'a>(scratch: &'a mut String, font: &str, text: &str) -> &'a str {
        scratch.clear();
        scratch.reserve(font.len() + 1 + text.len());
        scratch.push_str(font);
        scratch.push('\n');
        scratch.push_str(text);
        scratch.as_str()
    }
}

/// [`TextMeasure`] backed by a canvas context, used for column auto-sizing.
pub struct CanvasTextMeasure {
    ctx: CanvasRenderingContext2d,
    cache: RefCell<TextMeasureCache>,
}

impl CanvasTextMeasure {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            cache: RefCell::new(TextMeasureCache::new(TEXT_MEASURE_CACHE_CAP)),
        }
    }
}

impl TextMeasure for CanvasTextMeasure {
    fn text_width(&self, text: &str, font: &str) -> f64 {
        self.ctx.save();
        let width = self.cache.borrow_mut().measure(&self.ctx, font, text);
        self.ctx.restore();
        width
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::TextMeasureCache;

    #[test]
    fn test_cache_reuses_entries() {
        let mut cache = TextMeasureCache::new(2);
        assert_eq!(cache.get("12px Inter", "hello"), None);
        cache.insert("12px Inter", "hello", 12.0);
        assert_eq!(cache.get("12px Inter", "hello"), Some(12.0));
        cache.insert("12px Inter", "hello", 22.0);
        assert_eq!(cache.get("12px Inter", "hello"), Some(12.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_keys_include_font() {
        let mut cache = TextMeasureCache::new(4);
        cache.insert("12px Inter", "x", 7.0);
        assert_eq!(cache.get("bold 12px Inter", "x"), None);
    }

    #[test]
    fn test_cache_enforces_cap() {
        let mut cache = TextMeasureCache::new(2);
        cache.insert("12px Inter", "a", 1.0);
        cache.insert("12px Inter", "b", 2.0);
        cache.insert("12px Inter", "c", 3.0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("12px Inter", "a"), None);
        assert_eq!(cache.get("12px Inter", "c"), Some(3.0));
    }

    #[test]
    fn test_zero_cap_disables_cache() {
        let mut cache = TextMeasureCache::new(0);
        cache.insert("12px Inter", "a", 1.0);
        assert_eq!(cache.get("12px Inter", "a"), None);
    }
}
