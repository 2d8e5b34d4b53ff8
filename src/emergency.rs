//! Static emergency panel shown alongside every page.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub label: &'static str,
    pub number: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickPhrase {
    pub english: &'static str,
    pub hindi: &'static str,
    pub transliteration: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EmergencyPanel {
    pub contacts: &'static [EmergencyContact],
    pub phrases: &'static [QuickPhrase],
}

pub const CONTACTS: &[EmergencyContact] = &[
    EmergencyContact {
        label: "Police",
        number: "100",
    },
    EmergencyContact {
        label: "Ambulance",
        number: "102",
    },
    EmergencyContact {
        label: "Fire",
        number: "101",
    },
    EmergencyContact {
        label: "Tourist Helpline",
        number: "1363",
    },
];

pub const PHRASES: &[QuickPhrase] = &[
    QuickPhrase {
        english: "I need help",
        hindi: "मुझे मदद चाहिए",
        transliteration: "Mujhe madad chahiye",
    },
    QuickPhrase {
        english: "I am lost",
        hindi: "मैं खो गया हूँ",
        transliteration: "Main kho gaya hoon",
    },
    QuickPhrase {
        english: "Please call hospital",
        hindi: "कृपया अस्पताल बुलाएं",
        transliteration: "Kripya aspataal bulaayein",
    },
];

pub fn panel() -> EmergencyPanel {
    EmergencyPanel {
        contacts: CONTACTS,
        phrases: PHRASES,
    }
}

pub fn lookup(label: &str) -> Option<&'static EmergencyContact> {
    CONTACTS
        .iter()
        .find(|contact| contact.label.eq_ignore_ascii_case(label.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("police").map(|c| c.number), Some("100"));
        assert_eq!(lookup(" Tourist Helpline ").map(|c| c.number), Some("1363"));
        assert!(lookup("coast guard").is_none());
    }

    #[test]
    fn panel_serializes_contacts_and_phrases() {
        let value = serde_json::to_value(panel()).unwrap();
        assert_eq!(value["contacts"].as_array().unwrap().len(), 4);
        assert_eq!(value["phrases"][0]["english"], "I need help");
    }
}
