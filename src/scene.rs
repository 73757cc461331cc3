//! Rendering collaborator: an id-keyed set of drawable snapshots.
//!
//! The grid owns its tiles. The scene only ever receives copies, pushed through
//! [`Stage`] whenever a tile or the selector changes.

use crate::assets::{Assets, Sprite};
use crate::tile::{Drawable, Layer, Position};
use log::warn;
use std::collections::HashMap;

/// Snapshot of one drawable as the scene sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneObject {
    pub id: String,
    pub position: Position,
    pub width: u32,
    pub height: u32,
    pub layer: Layer,
    pub sprite: Sprite,
}

/// Scene collaborator interface.
pub trait Scene {
    /// Insert or replace the drawable keyed by `object.id`.
    fn set_object(&mut self, object: SceneObject);
    /// Remove a drawable. Unknown ids are ignored.
    fn destroy_object(&mut self, id: &str);
}

/// Default scene: a map of snapshots, read back by the terminal renderer.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    objects: HashMap<String, SceneObject>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in paint order (lower layers first).
    pub fn draw_order(&self) -> Vec<&SceneObject> {
        let mut objects: Vec<&SceneObject> = self.objects.values().collect();
        objects.sort_by(|a, b| a.layer.cmp(&b.layer).then_with(|| a.id.cmp(&b.id)));
        objects
    }
}

impl Scene for SceneGraph {
    fn set_object(&mut self, object: SceneObject) {
        self.objects.insert(object.id.clone(), object);
    }

    fn destroy_object(&mut self, id: &str) {
        self.objects.remove(id);
    }
}

/// Scene plus asset lookup, borrowed for the duration of one mutation.
pub struct Stage<'a> {
    scene: &'a mut dyn Scene,
    assets: &'a dyn Assets,
}

impl<'a> Stage<'a> {
    pub fn new(scene: &'a mut dyn Scene, assets: &'a dyn Assets) -> Self {
        Self { scene, assets }
    }

    /// Resolve the sprite and upsert a snapshot of `drawable`.
    /// A sprite that fails to resolve is replaced with [`Sprite::placeholder`].
    pub fn show(&mut self, drawable: &dyn Drawable) {
        let sprite = match drawable.sprite_key() {
            Some(key) => self.assets.image_by_id(key).unwrap_or_else(|err| {
                warn!("{} on {}; drawing placeholder", err, drawable.object_id());
                Sprite::placeholder()
            }),
            None => Sprite::placeholder(),
        };
        self.scene.set_object(SceneObject {
            id: drawable.object_id().to_string(),
            position: drawable.position(),
            width: drawable.width(),
            height: drawable.height(),
            layer: drawable.layer(),
            sprite,
        });
    }

    pub fn hide(&mut self, id: &str) {
        self.scene.destroy_object(id);
    }
}
