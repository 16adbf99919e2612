//! Data models and structures used throughout the application

use serde::{Deserialize, Serialize};

/// Gender of the model identity being styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }

    pub fn parse(value: &str) -> Option<Gender> {
        match value {
            "female" => Some(Gender::Female),
            "male" => Some(Gender::Male),
            _ => None,
        }
    }
}

/// Background treatment requested for generated photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    White,
    KeepOriginal,
}

impl BackgroundMode {
    /// Literal value substituted into the prompt template
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundMode::White => "white",
            BackgroundMode::KeepOriginal => "keep_original",
        }
    }

    pub fn parse(value: &str) -> Option<BackgroundMode> {
        match value {
            "white" => Some(BackgroundMode::White),
            "keep_original" => Some(BackgroundMode::KeepOriginal),
            _ => None,
        }
    }
}

/// Generative model tier a batch is issued against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelTier {
    #[serde(rename = "gemini-3-pro-image-preview")]
    Pro,
    #[serde(rename = "gemini-2.5-flash-image")]
    Flash,
}

impl ModelTier {
    /// Model identifier as the service expects it in the request path
    pub fn model_name(&self) -> &'static str {
        match self {
            ModelTier::Pro => "gemini-3-pro-image-preview",
            ModelTier::Flash => "gemini-2.5-flash-image",
        }
    }

    pub fn parse(value: &str) -> Option<ModelTier> {
        match value {
            "gemini-3-pro-image-preview" | "pro" => Some(ModelTier::Pro),
            "gemini-2.5-flash-image" | "flash" => Some(ModelTier::Flash),
            _ => None,
        }
    }
}

/// A user-supplied reference image bound to one input slot.
///
/// Immutable once created; a slot is always replaced wholesale. The raw bytes
/// are not serialized into session snapshots, `encoded_payload` carries the
/// same data in wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    #[serde(skip)]
    pub raw_bytes: Vec<u8>,
    /// `data:` URL directly displayable by a preview surface
    pub preview_handle: String,
    /// Base64 payload without the `data:` prefix, as the wire expects
    pub encoded_payload: String,
    pub mime_type: String,
}

/// One named image input position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    StylingRef,
    FaceRef,
    Top,
    Bottom,
    Shoes,
    Sunglasses,
    Necklace,
    Earrings,
    Jewelry,
    Hat,
    Bag,
    Belt,
}

impl SlotKey {
    /// Canonical slot order; the service's prompt grounding depends on it
    pub const ALL: [SlotKey; 12] = [
        SlotKey::StylingRef,
        SlotKey::FaceRef,
        SlotKey::Top,
        SlotKey::Bottom,
        SlotKey::Shoes,
        SlotKey::Sunglasses,
        SlotKey::Necklace,
        SlotKey::Earrings,
        SlotKey::Jewelry,
        SlotKey::Hat,
        SlotKey::Bag,
        SlotKey::Belt,
    ];

    /// Label emitted ahead of the slot's image part in a request
    pub fn label(&self) -> &'static str {
        match self {
            SlotKey::StylingRef => "Styling Reference",
            SlotKey::FaceRef => "Face Reference",
            SlotKey::Top => "Garment Top",
            SlotKey::Bottom => "Garment Bottom",
            SlotKey::Shoes => "Shoes",
            SlotKey::Sunglasses => "Sunglasses",
            SlotKey::Necklace => "Necklace",
            SlotKey::Earrings => "Earrings",
            SlotKey::Jewelry => "Jewelry",
            SlotKey::Hat => "Hat/Scarf",
            SlotKey::Bag => "Bag",
            SlotKey::Belt => "Belt",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKey::StylingRef => "styling_ref",
            SlotKey::FaceRef => "face_ref",
            SlotKey::Top => "top",
            SlotKey::Bottom => "bottom",
            SlotKey::Shoes => "shoes",
            SlotKey::Sunglasses => "sunglasses",
            SlotKey::Necklace => "necklace",
            SlotKey::Earrings => "earrings",
            SlotKey::Jewelry => "jewelry",
            SlotKey::Hat => "hat",
            SlotKey::Bag => "bag",
            SlotKey::Belt => "belt",
        }
    }

    /// Styling and face references must be present before a batch can run
    pub fn is_required(&self) -> bool {
        matches!(self, SlotKey::StylingRef | SlotKey::FaceRef)
    }
}

/// The full set of image input slots for one generate action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationInputs {
    pub styling_ref: Option<UploadedImage>,
    pub face_ref: Option<UploadedImage>,
    pub top: Option<UploadedImage>,
    pub bottom: Option<UploadedImage>,
    pub shoes: Option<UploadedImage>,
    pub sunglasses: Option<UploadedImage>,
    pub necklace: Option<UploadedImage>,
    pub earrings: Option<UploadedImage>,
    pub jewelry: Option<UploadedImage>,
    pub hat: Option<UploadedImage>,
    pub bag: Option<UploadedImage>,
    pub belt: Option<UploadedImage>,
}

impl GenerationInputs {
    pub fn get(&self, slot: SlotKey) -> Option<&UploadedImage> {
        match slot {
            SlotKey::StylingRef => self.styling_ref.as_ref(),
            SlotKey::FaceRef => self.face_ref.as_ref(),
            SlotKey::Top => self.top.as_ref(),
            SlotKey::Bottom => self.bottom.as_ref(),
            SlotKey::Shoes => self.shoes.as_ref(),
            SlotKey::Sunglasses => self.sunglasses.as_ref(),
            SlotKey::Necklace => self.necklace.as_ref(),
            SlotKey::Earrings => self.earrings.as_ref(),
            SlotKey::Jewelry => self.jewelry.as_ref(),
            SlotKey::Hat => self.hat.as_ref(),
            SlotKey::Bag => self.bag.as_ref(),
            SlotKey::Belt => self.belt.as_ref(),
        }
    }

    pub fn set(&mut self, slot: SlotKey, image: Option<UploadedImage>) {
        let target = match slot {
            SlotKey::StylingRef => &mut self.styling_ref,
            SlotKey::FaceRef => &mut self.face_ref,
            SlotKey::Top => &mut self.top,
            SlotKey::Bottom => &mut self.bottom,
            SlotKey::Shoes => &mut self.shoes,
            SlotKey::Sunglasses => &mut self.sunglasses,
            SlotKey::Necklace => &mut self.necklace,
            SlotKey::Earrings => &mut self.earrings,
            SlotKey::Jewelry => &mut self.jewelry,
            SlotKey::Hat => &mut self.hat,
            SlotKey::Bag => &mut self.bag,
            SlotKey::Belt => &mut self.belt,
        };
        *target = image;
    }

    /// Set slots in canonical order
    pub fn slots(&self) -> impl Iterator<Item = (SlotKey, &UploadedImage)> {
        SlotKey::ALL
            .iter()
            .filter_map(|slot| self.get(*slot).map(|image| (*slot, image)))
    }
}

/// Parameters captured for one batch; pose ids are ordered, unique and 1..=3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub gender: Gender,
    pub background_mode: BackgroundMode,
    pub model: ModelTier,
    pub pose_ids: Vec<String>,
}

/// One image extracted from a service response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl GeneratedImage {
    /// `data:` URL form, directly displayable
    pub fn to_data_url(&self) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// One completed, successful batch: inputs, parameters and resulting images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub inputs: GenerationInputs,
    pub parameters: GenerationParameters,
    /// Displayable image references, index-aligned with `parameters.pose_ids`
    pub outputs: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Compact view of a session for history browsing
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub timestamp: i64,
    pub gender: Gender,
    pub background_mode: BackgroundMode,
    pub pose_ids: Vec<String>,
    pub model: ModelTier,
    pub output_count: usize,
    pub thumbnail: Option<String>,
}
