//! Request payload assembly for the generative image service

use serde::Serialize;

use crate::models::GenerationInputs;

/// One part of a `generateContent` request: prose or inline image data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text { text: String },
    InlineImage {
        #[serde(rename = "inlineData")]
        inline_data: InlinePayload,
    },
}

/// Base64 image payload with its MIME type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlinePayload {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub role: &'static str,
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestGenerationConfig {
    pub temperature: f32,
    pub aspect_ratio: String,
}

/// Complete request body for one pose
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: RequestGenerationConfig,
}

/// Assembles the ordered part list: composed prompt first, then for every set
/// slot a text label followed by the image payload. Unset slots contribute
/// nothing, the service must not see empty placeholders.
pub fn build_parts(prompt: String, inputs: &GenerationInputs) -> Vec<RequestPart> {
    let mut parts = vec![RequestPart::Text { text: prompt }];

    for (slot, image) in inputs.slots() {
        parts.push(RequestPart::Text {
            text: format!("\n[Reference Image: {}]", slot.label()),
        });
        parts.push(RequestPart::InlineImage {
            inline_data: InlinePayload {
                mime_type: image.mime_type.clone(),
                data: image.encoded_payload.clone(),
            },
        });
    }

    parts
}

/// Builds the full request body around the ordered parts
pub fn build_request(
    prompt: String,
    inputs: &GenerationInputs,
    temperature: f32,
    aspect_ratio: &str,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user",
            parts: build_parts(prompt, inputs),
        }],
        generation_config: RequestGenerationConfig {
            temperature,
            aspect_ratio: aspect_ratio.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotKey, UploadedImage};

    fn stub_image(tag: &str) -> UploadedImage {
        UploadedImage {
            raw_bytes: Vec::new(),
            preview_handle: format!("data:image/png;base64,{}", tag),
            encoded_payload: tag.to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    fn inputs_with(slots: &[SlotKey]) -> GenerationInputs {
        let mut inputs = GenerationInputs::default();
        for slot in slots {
            inputs.set(*slot, Some(stub_image(slot.as_str())));
        }
        inputs
    }

    #[test]
    fn prompt_is_always_the_first_part() {
        let inputs = inputs_with(&[SlotKey::StylingRef, SlotKey::FaceRef]);
        let parts = build_parts("the prompt".to_string(), &inputs);
        assert_eq!(
            parts[0],
            RequestPart::Text {
                text: "the prompt".to_string()
            }
        );
    }

    #[test]
    fn set_slots_emit_label_then_image_in_canonical_order() {
        let inputs = inputs_with(&[SlotKey::Belt, SlotKey::FaceRef, SlotKey::Top]);
        let parts = build_parts("p".to_string(), &inputs);

        // prompt + 3 slots * (label + image)
        assert_eq!(parts.len(), 7);

        let labels: Vec<String> = parts
            .iter()
            .skip(1)
            .step_by(2)
            .map(|part| match part {
                RequestPart::Text { text } => text.clone(),
                other => panic!("expected label part, got {:?}", other),
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                "\n[Reference Image: Face Reference]",
                "\n[Reference Image: Garment Top]",
                "\n[Reference Image: Belt]",
            ]
        );

        match &parts[2] {
            RequestPart::InlineImage { inline_data } => {
                assert_eq!(inline_data.data, "face_ref");
                assert_eq!(inline_data.mime_type, "image/png");
            }
            other => panic!("expected image part, got {:?}", other),
        }
    }

    #[test]
    fn unset_slots_are_skipped_entirely() {
        let inputs = inputs_with(&[SlotKey::StylingRef, SlotKey::FaceRef]);
        let parts = build_parts("p".to_string(), &inputs);
        assert_eq!(parts.len(), 5);

        let all = inputs_with(&SlotKey::ALL);
        let parts = build_parts("p".to_string(), &all);
        assert_eq!(parts.len(), 25);
    }

    #[test]
    fn request_serializes_with_service_field_names() {
        let inputs = inputs_with(&[SlotKey::StylingRef]);
        let request = build_request("p".to_string(), &inputs, 1.0, "9:16");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["generationConfig"]["temperature"], 1.0);
        assert_eq!(value["generationConfig"]["aspectRatio"], "9:16");
        assert_eq!(
            value["contents"][0]["parts"][1]["text"],
            "\n[Reference Image: Styling Reference]"
        );
        assert_eq!(
            value["contents"][0]["parts"][2]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(
            value["contents"][0]["parts"][2]["inlineData"]["data"],
            "styling_ref"
        );
    }
}
