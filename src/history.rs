//! Outfit layers and the look history stack.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ports::InlineImage;

/// One applied edit: the resulting image and what produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutfitLayer {
    id: Uuid,
    image: InlineImage,
    description: String,
    timestamp: DateTime<Utc>,
}

impl OutfitLayer {
    /// Create a layer stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(image: InlineImage, description: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), image, description: description.into(), timestamp: Utc::now() }
    }

    /// Unique layer id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The composited image this edit produced.
    #[must_use]
    pub fn image(&self) -> &InlineImage {
        &self.image
    }

    /// Human-readable label.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the layer was created.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Applied layers in chronological order. Only the tail can change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    layers: Vec<OutfitLayer>,
}

impl History {
    /// Append a layer.
    pub fn push(&mut self, layer: OutfitLayer) {
        self.layers.push(layer);
    }

    /// Remove and return the most recent layer.
    pub fn pop(&mut self) -> Option<OutfitLayer> {
        self.layers.pop()
    }

    /// The most recent layer.
    #[must_use]
    pub fn last(&self) -> Option<&OutfitLayer> {
        self.layers.last()
    }

    /// Drop every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Number of applied layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer has been applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, OutfitLayer> {
        self.layers.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a OutfitLayer;
    type IntoIter = std::slice::Iter<'a, OutfitLayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
