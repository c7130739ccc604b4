use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Exporter settings bound to one game. Passed explicitly into everything that reads them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: String,
    pub game: String,
    pub appid: String,
    pub enable_colliders: bool,
    pub mtl_prop_0_visible: bool,
    pub mtl_prop_0_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: "2.10".to_owned(),
            game: "Zulu".to_owned(),
            appid: "Jagged Alliance 3".to_owned(),
            enable_colliders: true,
            mtl_prop_0_visible: true,
            mtl_prop_0_name: "Unit".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InheritChoice {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

const fn choice(id: &'static str, label: &'static str, description: &'static str) -> InheritChoice {
    InheritChoice {
        id,
        label,
        description,
    }
}

const NO_INHERITANCE: &[InheritChoice] = &[choice("None", "None", "no inheritance")];

const ZULU_INHERITANCE: &[InheritChoice] = &[
    choice("None", "None", "no inheritance"),
    choice("Male", "Male animations", "Inherits male torso animations"),
    choice(
        "Animal_Crocodile",
        "Animal_Crocodile animations",
        "Animal_Crocodile animations",
    ),
    choice("Animal_Hen", "Animal_Hen animations", "Animal_Hen animations"),
    choice("Animal_Hyena", "Animal_Hyena animations", "Animal_Hyena animations"),
];

const BACON_INHERITANCE: &[InheritChoice] = &[
    choice("None", "No", "no inheritance"),
    choice("HumanMale", "Yes", "Inherits human animations"),
];

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Settings> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        Settings::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse settings {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Settings> {
        Ok(toml::from_str(contents)?)
    }

    /// The animation sets a mesh of this game may inherit from. Unknown games only get "None".
    pub fn inherit_animation_choices(&self) -> &'static [InheritChoice] {
        match self.game.as_str() {
            "Zulu" => ZULU_INHERITANCE,
            "Bacon" => BACON_INHERITANCE,
            _ => NO_INHERITANCE,
        }
    }

    pub fn inherit_choice(&self, id: &str) -> Option<&'static InheritChoice> {
        self.inherit_animation_choices().iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            game = "Bacon"
            enable_colliders = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.game, "Bacon");
        assert!(!settings.enable_colliders);
        assert_eq!(settings.appid, "Jagged Alliance 3");
    }

    #[test]
    fn inherit_choices_follow_game() {
        let mut settings = Settings::default();
        assert!(settings.inherit_choice("Animal_Hen").is_some());
        assert!(settings.inherit_choice("HumanMale").is_none());

        settings.game = "Bacon".into();
        assert_eq!(settings.inherit_choice("HumanMale").unwrap().label, "Yes");

        settings.game = "Unknown".into();
        assert_eq!(settings.inherit_animation_choices().len(), 1);
        assert!(settings.inherit_choice("None").is_some());
    }
}
