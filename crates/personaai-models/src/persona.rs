use serde::{Deserialize, Serialize};

/// A persona preset: a label for the picker and the directive that is
/// prefixed to the user's input to steer response style. Recomputed per
/// send; no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub label: String,
    pub directive: String,
}

impl Persona {
    pub fn new(label: impl Into<String>, directive: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            directive: directive.into(),
        }
    }

    /// The outbound prompt for one turn: `"<directive> <input>"`.
    pub fn compose_prompt(&self, input: &str) -> String {
        format!("{} {}", self.directive, input)
    }
}

/// The built-in persona presets, as the product shipped them.
pub fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona::new("Default", "You are a helpful and informative chatbot."),
        Persona::new(
            "Friendly Sarcastic",
            "You are a friendly and sarcastic assistant.",
        ),
        Persona::new(
            "Enthusiastic Travel Guide",
            "You are an enthusiastic and slightly dramatic travel guide.",
        ),
        Persona::new("Concise and Direct", "Respond concisely and directly."),
        Persona::new(
            "Formal and Professional",
            "Respond in a formal and professional manner.",
        ),
        Persona::new(
            "Itinerary Generator",
            "You are an itinerary generator that helps users plan their trips in detail.",
        ),
        Persona::new(
            "Nutrition Advisor",
            "You give meal suggestions and nutritional tips based on user preferences \
             and dietary needs. If the question is not about food, health, or nutrition, \
             respond with: I'm here to help with food and nutrition. Could you ask \
             something related to that?",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compose_prompt_prefixes_directive() {
        let persona = Persona::new("Concise and Direct", "Respond concisely and directly.");
        assert_eq!(
            persona.compose_prompt("What is 2+2?"),
            "Respond concisely and directly. What is 2+2?"
        );
    }

    #[test]
    fn builtin_set_has_seven_presets_and_default_first() {
        let personas = builtin_personas();
        assert_eq!(personas.len(), 7);
        assert_eq!(personas[0].label, "Default");
        assert_eq!(
            personas[0].directive,
            "You are a helpful and informative chatbot."
        );
    }
}
