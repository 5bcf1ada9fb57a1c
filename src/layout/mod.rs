pub mod queue;
pub mod watcher;

pub use queue::{create_layout_queue, LayoutEvent, LayoutReceiver, LayoutSender};
pub use watcher::LayoutWatcher;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::narration::TriggerKind;

/// What a region is, which decides whether it narrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionKind {
    /// Landing area; the robot spawns beside it
    Hero,
    Skills,
    Projects,
    AcademicProjects,
    Contact,
    /// Small landmark the robot greets visitors from
    HomeArrow,
    /// Plain content block, obstacle only
    Block,
}

impl RegionKind {
    /// The narration trigger this kind of region drives, if any
    pub fn trigger(&self) -> Option<TriggerKind> {
        match self {
            RegionKind::Skills => Some(TriggerKind::Skills),
            RegionKind::Projects => Some(TriggerKind::Projects),
            RegionKind::AcademicProjects => Some(TriggerKind::AcademicProjects),
            RegionKind::Contact => Some(TriggerKind::Contact),
            RegionKind::HomeArrow => Some(TriggerKind::HomeArrow),
            RegionKind::Hero | RegionKind::Block => None,
        }
    }
}

/// Rectangle as written in layout files: origin plus size
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RectSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectSpec {
    pub fn to_rect(self) -> Rect {
        Rect::from_size(self.x, self.y, self.width, self.height)
    }
}

/// A named rectangular region of the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub kind: RegionKind,
    pub label: String,
    pub rect: RectSpec,
}

impl Region {
    pub fn rect(&self) -> Rect {
        self.rect.to_rect()
    }
}

/// The page the robot lives on: a fixed-size world and its content regions.
/// Every region rect doubles as an obstacle; named kinds also drive
/// narration triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub regions: Vec<Region>,
}

impl PageLayout {
    /// Read and parse a layout document from disk
    pub fn load(
        path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let text = std::fs::read_to_string(path)?;
        let layout: PageLayout = serde_json::from_str(&text)?;
        Ok(layout)
    }

    /// All region rects, the obstacle set for grid rebuilds
    pub fn obstacle_rects(&self) -> Vec<Rect> {
        self.regions.iter().map(|r| r.rect()).collect()
    }

    /// First region of the given kind
    pub fn region_of_kind(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == kind)
    }

    /// Regions that drive narration, paired with their trigger
    pub fn trigger_regions(&self) -> impl Iterator<Item = (TriggerKind, &Region)> {
        self.regions
            .iter()
            .filter_map(|r| r.kind.trigger().map(|t| (t, r)))
    }
}
