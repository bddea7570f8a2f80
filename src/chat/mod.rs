//! Scripted assistant for the chat widget.
//!
//! Replies come from a fixed, ordered rule table; the first rule whose
//! keyword groups all appear in the lowercased message wins. Keywords are
//! listed in English and Portuguese.

mod session;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use session::{ChatSession, Submission};

pub const GREETING: &str =
    "Hi! I'm Algodinho, your cotton and yield gap specialist! How can I help?";

pub const YIELD_GAP_RESPONSE: &str = "The yield gap is the difference between the yield a farm could potentially reach and the yield it actually gets. I'm here to help growers close that gap!";

pub const FALLBACK_RESPONSE: &str = "I can help with the yield gap, cotton production, pest and disease management, irrigation, soil and technology! What would you like to know?";

const COTTON_PRODUCTION_RESPONSE: &str = "Brazil is one of the world's largest cotton producers! The main producing states are Mato Grosso and Bahia. Sustainable, efficient production is key for the sector.";

const PEST_RESPONSE: &str = "Integrated pest management (IPM) is essential in cotton. The main pests are the boll weevil, caterpillars and stink bugs. Constant scouting is important!";

const IRRIGATION_RESPONSE: &str = "Good irrigation is fundamental to closing the yield gap. I recommend efficient systems such as drip or center pivot, always tracking the crop's water needs.";

const SOIL_RESPONSE: &str = "Soil management is crucial! I recommend regular soil tests, proper liming and conservation practices such as no-till and crop rotation.";

const TECHNOLOGY_RESPONSE: &str = "Digital agriculture plays an important part in closing the yield gap! Drones, sensors, GPS and farm management software all help with decision making.";

/// A canned reply and when to give it.
///
/// `groups` is a conjunction of alternatives: every group must have at least
/// one keyword in the message. A rule with no groups matches everything.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub groups: &'static [&'static [&'static str]],
    pub response: &'static str,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|keyword| lowered.contains(keyword)))
    }
}

const RULES: &[Rule] = &[
    Rule {
        groups: &[&["yield gap"]],
        response: YIELD_GAP_RESPONSE,
    },
    Rule {
        groups: &[&["algodão", "cotton"], &["produção", "production"]],
        response: COTTON_PRODUCTION_RESPONSE,
    },
    Rule {
        groups: &[&["pragas", "doenças", "pest", "disease"]],
        response: PEST_RESPONSE,
    },
    Rule {
        groups: &[&["irrigação", "irrigation"]],
        response: IRRIGATION_RESPONSE,
    },
    Rule {
        groups: &[&["solo", "soil"]],
        response: SOIL_RESPONSE,
    },
    Rule {
        groups: &[&["tecnologia", "technology", "digital"]],
        response: TECHNOLOGY_RESPONSE,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Responder {
    rules: &'static [Rule],
}

impl Default for Responder {
    fn default() -> Self {
        Self { rules: RULES }
    }
}

impl Responder {
    pub fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn respond(&self, text: &str) -> &'static str {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.response)
            .unwrap_or(FALLBACK_RESPONSE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub text: String,
    pub author: Author,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Author::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Author::Bot)
    }

    fn new(text: impl Into<String>, author: Author) -> Self {
        Self {
            text: text.into(),
            author,
            sent_at: Utc::now(),
        }
    }
}

/// Append-only message log, opened with the bot greeting.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::bot(GREETING)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
