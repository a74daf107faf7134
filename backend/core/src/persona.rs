//! The fixed expert persona table.
//!
//! Five personas, each with an immutable instruction used as the model's
//! system message and a short description shown next to the selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// One of the five expert roles a question can be addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Medical,
    #[default]
    Engineer,
    Consultant,
    Educator,
    Counselor,
}

/// Static record attached to each persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaProfile {
    /// Stable wire identifier used by forms, JSON and the CLI.
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    /// System-level context sent with every question.
    pub instruction: &'static str,
    pub description: &'static str,
}

static PROFILES: [PersonaProfile; 5] = [
    PersonaProfile {
        key: "medical",
        label: "Medical Expert",
        icon: "🏥",
        instruction: "You are an experienced medical expert. Based on medical knowledge, \
            provide accurate and reliable medical information. However, avoid giving specific \
            diagnoses or treatment instructions, and recommend consulting a medical institution \
            when appropriate. When you use technical terms, add an easy-to-understand \
            explanation alongside them.",
        description: "Health consultations grounded in medical knowledge",
    },
    PersonaProfile {
        key: "engineer",
        label: "IT Engineer",
        icon: "💻",
        instruction: "You are an experienced IT engineer. Provide practical, concrete advice on \
            programming, system design, and technical problem solving. When you write code, \
            show examples that are highly readable and follow best practices.",
        description: "Technical problem solving and programming",
    },
    PersonaProfile {
        key: "consultant",
        label: "Management Consultant",
        icon: "📈",
        instruction: "You are an experienced management consultant. Provide practical, \
            strategic advice on management challenges such as business strategy, organizational \
            operations, marketing, and financial management. Emphasize a data-driven \
            perspective and concrete action plans.",
        description: "Business strategy and management challenges",
    },
    PersonaProfile {
        key: "educator",
        label: "Education Specialist",
        icon: "📚",
        instruction: "You are an experienced education specialist. Provide effective advice on \
            learning methods, teaching techniques, and curriculum design. Emphasize \
            individualized guidance suited to the learner's level and situation.",
        description: "Learning methods and teaching techniques",
    },
    PersonaProfile {
        key: "counselor",
        label: "Psychological Counselor",
        icon: "🧠",
        instruction: "You are an experienced psychological counselor. Provide empathetic and \
            constructive advice on mental health, relationships, and stress management. \
            Maintain a listening attitude and recommend consulting a professional institution \
            when appropriate.",
        description: "Mental health and relationships",
    },
];

impl Persona {
    /// All personas in display order.
    pub const ALL: [Persona; 5] = [
        Persona::Medical,
        Persona::Engineer,
        Persona::Consultant,
        Persona::Educator,
        Persona::Counselor,
    ];

    pub fn profile(self) -> &'static PersonaProfile {
        &PROFILES[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.profile().key
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }

    pub fn instruction(self) -> &'static str {
        self.profile().instruction
    }

    /// Description prefixed with the persona's icon, as shown in the UI.
    pub fn display_description(self) -> String {
        let p = self.profile();
        format!("{} {}", p.icon, p.description)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Persona {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Persona::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DeskError::UnknownPersona(s.to_string()))
    }
}
