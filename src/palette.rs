pub const ASSET_DIR: &str = "assets";
const HERO_OVERLAY: &str = "linear-gradient(rgba(0,0,0,0.65), rgba(0,0,0,0.65))";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub label: &'static str,
    pub accent: &'static str,
    pub primary: &'static str,
    pub hero_image: &'static str,
}

pub const DEFAULT_PALETTE: Palette = Palette {
    name: "default",
    label: "Commanding",
    accent: "#e7473c",
    primary: "#1f1f1f",
    hero_image: "commanding_bg.png",
};

pub const PALETTES: [Palette; 4] = [
    DEFAULT_PALETTE,
    Palette {
        name: "corporate",
        label: "Corporate",
        accent: "#8c8c8c",
        primary: "#1a4d70",
        hero_image: "corporate_bg.png",
    },
    Palette {
        name: "industrial",
        label: "Industrial",
        accent: "#ff6b00",
        primary: "#2c3539",
        hero_image: "industrial_bg.png",
    },
    Palette {
        name: "athletic",
        label: "Athletic",
        accent: "#dc143c",
        primary: "#0080ff",
        hero_image: "athletic_bg.png",
    },
];

impl Palette {
    /// Unknown or missing names resolve to the default palette.
    pub fn resolve(name: Option<&str>) -> Palette {
        name.and_then(|name| PALETTES.iter().find(|palette| palette.name == name))
            .copied()
            .unwrap_or(DEFAULT_PALETTE)
    }

    /// Custom properties written on both `<html>` and `<body>`.
    pub fn custom_properties(&self) -> [(&'static str, &'static str); 2] {
        [("--accent", self.accent), ("--primary", self.primary)]
    }

    pub fn hero_background(&self) -> String {
        format!("{HERO_OVERLAY}, url('{ASSET_DIR}/{}')", self.hero_image)
    }
}
