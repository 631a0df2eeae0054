//! Deployment status layout

use shipyard_core::dto::slack::{Accessory, Block, ButtonStyle, Element, Text};

/// Main section of a status message
#[derive(Debug, Clone, Default)]
pub struct StatusBody {
    pub title: String,
    /// Markdown fields such as `*Stage:* Deploy`
    pub fields: Vec<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusAction {
    pub text: String,
    pub url: String,
    pub style: Option<ButtonStyle>,
}

impl StatusAction {
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            style: None,
        }
    }
}

/// Header, divider, body, buttons and a context footer
pub fn deployment_status_blocks(
    header: &str,
    body: StatusBody,
    actions: Vec<StatusAction>,
    footer: &str,
) -> Vec<Block> {
    let accessory = body.image_url.map(|image_url| Accessory::Image {
        image_url,
        alt_text: body.title.clone(),
    });

    vec![
        Block::Section {
            text: Text::PlainText {
                text: header.to_string(),
                emoji: Some(true),
            },
            fields: Vec::new(),
            accessory: None,
        },
        Block::Divider,
        Block::Section {
            text: Text::markdown(format!("*{}*", body.title)),
            fields: body.fields.into_iter().map(Text::markdown).collect(),
            accessory,
        },
        Block::Actions {
            elements: actions
                .into_iter()
                .map(|action| Element::Button {
                    text: Text::plain(action.text),
                    url: action.url,
                    style: action.style,
                })
                .collect(),
        },
        Block::Context {
            elements: vec![Text::markdown(footer)],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layout() {
        let blocks = deployment_status_blocks(
            "Deployment state updated",
            StatusBody {
                title: "orders".to_string(),
                fields: vec!["*State:* FAILED".to_string()],
                image_url: None,
            },
            vec![StatusAction {
                text: "View".to_string(),
                url: "https://example.com".to_string(),
                style: Some(ButtonStyle::Danger),
            }],
            "Last Updated at now",
        );

        assert_eq!(
            serde_json::to_value(&blocks).unwrap(),
            json!([
                { "type": "section",
                  "text": { "type": "plain_text", "text": "Deployment state updated", "emoji": true } },
                { "type": "divider" },
                { "type": "section",
                  "text": { "type": "mrkdwn", "text": "*orders*" },
                  "fields": [{ "type": "mrkdwn", "text": "*State:* FAILED" }] },
                { "type": "actions", "elements": [
                    { "type": "button", "text": { "type": "plain_text", "text": "View" },
                      "url": "https://example.com", "style": "danger" }
                ]},
                { "type": "context", "elements": [{ "type": "mrkdwn", "text": "Last Updated at now" }] }
            ])
        );
    }

    #[test]
    fn test_image_accessory_uses_title() {
        let blocks = deployment_status_blocks(
            "Approval required",
            StatusBody {
                title: "orders".to_string(),
                fields: Vec::new(),
                image_url: Some("https://example.com/logo.png".to_string()),
            },
            Vec::new(),
            "footer",
        );

        let Block::Section { accessory, .. } = &blocks[2] else {
            panic!("expected the body section");
        };
        assert_eq!(
            accessory,
            &Some(Accessory::Image {
                image_url: "https://example.com/logo.png".to_string(),
                alt_text: "orders".to_string(),
            })
        );
    }
}
