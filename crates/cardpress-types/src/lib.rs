//! Shared types for the card document generation pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Raised when an external trigger names a template kind we do not know
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported template kind: {0}")]
pub struct UnknownTemplateKind(pub String);

/// Template families the render function knows how to lay out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    /// Multi-card digital sheet, A4 paper
    Digital,
    /// Multi-card digital sheet, US Letter paper
    DigitalUs,
    /// One card per sheet, front and back pages
    SingleSheetPrint,
    /// Card deck spread over multiple print sheets
    MultiSheetPrint,
}

impl TemplateKind {
    /// Layout constants for the items-to-pages mapping of this template
    pub fn layout(&self) -> LayoutConstants {
        match self {
            TemplateKind::Digital | TemplateKind::DigitalUs => LayoutConstants {
                items_per_page: 6,
                pages_per_item: 1,
            },
            // Print cards render one item per sheet as front + back
            TemplateKind::SingleSheetPrint | TemplateKind::MultiSheetPrint => LayoutConstants {
                items_per_page: 1,
                pages_per_item: 2,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Digital => "digital",
            TemplateKind::DigitalUs => "digital-us",
            TemplateKind::SingleSheetPrint => "single-sheet-print",
            TemplateKind::MultiSheetPrint => "multi-sheet-print",
        }
    }

    /// True for template kinds that go to a physical printer and need bleed
    pub fn is_print(&self) -> bool {
        matches!(
            self,
            TemplateKind::SingleSheetPrint | TemplateKind::MultiSheetPrint
        )
    }
}

impl FromStr for TemplateKind {
    type Err = UnknownTemplateKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digital" => Ok(TemplateKind::Digital),
            "digital-us" => Ok(TemplateKind::DigitalUs),
            "single-sheet-print" => Ok(TemplateKind::SingleSheetPrint),
            "multi-sheet-print" => Ok(TemplateKind::MultiSheetPrint),
            other => Err(UnknownTemplateKind(other.to_string())),
        }
    }
}

/// Paper size region for digital templates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// A4 paper
    Eu,
    /// US Letter paper
    Us,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Eu => "eu",
            Region::Us => "us",
        }
    }
}

/// Physical production variant requested by the order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PhysicalVariant {
    Standard,
    Eco,
    DoubleSided,
}

impl PhysicalVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicalVariant::Standard => "standard",
            PhysicalVariant::Eco => "eco",
            PhysicalVariant::DoubleSided => "double-sided",
        }
    }
}

/// Items-to-pages mapping constants for one template kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConstants {
    pub items_per_page: u32,
    pub pages_per_item: u32,
}

/// Descriptor for one generation job, created by the external trigger layer.
///
/// Immutable once planning starts; the pipeline never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub template_kind: TemplateKind,
    pub total_items: u32,
    pub region: Region,
    /// Subdirectory under the configured output root
    pub output_subdir: String,
    pub variant: PhysicalVariant,
    /// Human-readable label carried into the final file name
    pub label: String,
}

impl GenerationJob {
    pub fn new(
        template_kind: TemplateKind,
        total_items: u32,
        region: Region,
        output_subdir: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            template_kind,
            total_items,
            region,
            output_subdir: output_subdir.into(),
            variant: PhysicalVariant::Standard,
            label: label.into(),
        }
    }

    pub fn with_variant(mut self, variant: PhysicalVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// The single assembled document a finished job produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub page_count: u32,
    pub generated_at: DateTime<Utc>,
}
