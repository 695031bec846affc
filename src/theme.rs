pub const THEME_KEY: &str = "theme";
pub const DARK_CLASS: &str = "dark";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Only an exact `"dark"` selects the dark variant; everything else,
    /// including a missing entry, is light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "🌞",
            Self::Dark => "🌜",
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }
}

/// Durable key-value storage for the theme flag.
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeState {
    current: Theme,
}

impl ThemeState {
    pub fn load(store: &impl PreferenceStore) -> Self {
        let stored = store.read(THEME_KEY);
        Self {
            current: Theme::from_stored(stored.as_deref()),
        }
    }

    pub fn current(self) -> Theme {
        self.current
    }

    pub fn icon(self) -> &'static str {
        self.current.icon()
    }

    pub fn toggle(&mut self, store: &impl PreferenceStore) -> Theme {
        self.current = self.current.toggled();
        store.write(THEME_KEY, self.current.as_str());
        self.current
    }
}
