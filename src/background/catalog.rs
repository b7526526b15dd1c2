// Background catalog definition
// Twenty top-down pixel-art scenes; filenames follow the asset naming rule in
// `asset_filename` so they line up with the generated image set.
use serde::Serialize;
use std::sync::OnceLock;

/// One selectable world background (immutable once the catalog is built).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BackgroundRecord {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip)]
    pub description: &'static str,
    pub filename: String,
    pub tags: &'static [&'static str],
}

impl BackgroundRecord {
    pub fn new(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        tags: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            title,
            description,
            filename: asset_filename(title),
            tags,
        }
    }
}

/// Fixed record list plus the designated default (always a member).
#[derive(Debug)]
pub struct Catalog {
    records: Vec<BackgroundRecord>,
    default_idx: usize,
}

impl Catalog {
    /// Builds a catalog whose default is `records[default_idx]`. Panics on an
    /// empty list or out-of-range default: a catalog without a default
    /// cannot uphold the "always some record" contract.
    pub fn new(records: Vec<BackgroundRecord>, default_idx: usize) -> Self {
        assert!(
            default_idx < records.len(),
            "default background index {} out of range for {} records",
            default_idx,
            records.len()
        );
        Self {
            records,
            default_idx,
        }
    }

    pub fn records(&self) -> &[BackgroundRecord] {
        &self.records
    }

    pub fn default_record(&self) -> &BackgroundRecord {
        &self.records[self.default_idx]
    }

    /// Case-insensitive id lookup.
    pub fn get(&self, id: &str) -> Option<&BackgroundRecord> {
        self.records.iter().find(|r| r.id.eq_ignore_ascii_case(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// JSON manifest (`id`, `title`, `filename`, `tags`) for the renderer.
    pub fn manifest_json(&self) -> String {
        serde_json::to_string(&self.records).unwrap_or_else(|_| String::from("[]"))
    }
}

/// Derive a safe image filename from a scene title:
/// "Sunny Meadow Clearing" -> "sunny_meadow_clearing.png".
pub fn asset_filename(title: &str) -> String {
    let mut name = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            name.push(c);
        } else if matches!(c, ' ' | '-' | '_') && !name.ends_with('_') {
            name.push('_');
        }
    }
    let trimmed: String = name.trim_matches('_').chars().take(50).collect();
    if trimmed.is_empty() {
        String::from("background.png")
    } else {
        format!("{}.png", trimmed)
    }
}

fn build_records() -> Vec<BackgroundRecord> {
    vec![
        BackgroundRecord::new(
            "bg1",
            "Sunny Meadow Clearing",
            "Bright grass, soft wildflowers, warm midday sunlight.",
            &["sunshine", "happy", "bright", "meadow", "flowers"],
        ),
        BackgroundRecord::new(
            "bg2",
            "Rainbow Field",
            "Pastel meadow with a soft rainbow arc and sparkly accents.",
            &["rainbow", "colorful", "sky", "joyful", "clouds"],
        ),
        BackgroundRecord::new(
            "bg3",
            "Dark Enchanted Forest",
            "Mysterious forest with deep shadows and glowing elements.",
            &["dark", "mysterious", "forest", "spooky", "night"],
        ),
        BackgroundRecord::new(
            "bg4",
            "Ocean Sunset Beach",
            "Warm sunset over calm ocean waters with sandy beach.",
            &["ocean", "sunset", "beach", "peaceful", "waves"],
        ),
        BackgroundRecord::new(
            "bg5",
            "Snowy Mountain Peak",
            "Snow-covered mountain clearing with cool blue shadows.",
            &["snow", "mountain", "cold", "winter", "majestic"],
        ),
        BackgroundRecord::new(
            "bg6",
            "Magical Castle Grounds",
            "Fantasy castle courtyard with magical sparkles.",
            &["castle", "magical", "fantasy", "fairy tale", "royal"],
        ),
        BackgroundRecord::new(
            "bg7",
            "Space Nebula",
            "Cosmic space scene with colorful nebula and stars.",
            &["space", "stars", "nebula", "cosmic", "galaxy"],
        ),
        BackgroundRecord::new(
            "bg8",
            "Autumn Park Path",
            "Orange and red leaves scattered over dirt paths.",
            &["autumn", "leaves", "park", "orange", "peaceful"],
        ),
        BackgroundRecord::new(
            "bg9",
            "Underwater Coral Reef",
            "Vibrant coral reef with fish silhouettes.",
            &["underwater", "ocean", "coral", "fish", "blue"],
        ),
        BackgroundRecord::new(
            "bg10",
            "Cherry Blossom Garden",
            "Pink cherry blossom trees with petals floating.",
            &["cherry", "blossom", "pink", "spring", "japan"],
        ),
        BackgroundRecord::new(
            "bg11",
            "Desert Sand Dunes",
            "Warm desert landscape with rolling sand dunes.",
            &["desert", "sand", "hot", "dry", "adventure"],
        ),
        BackgroundRecord::new(
            "bg12",
            "City Night Skyline",
            "Nighttime city with glowing lights and modern buildings.",
            &["city", "night", "lights", "urban", "modern"],
        ),
        BackgroundRecord::new(
            "bg13",
            "Enchanted Garden",
            "Magical garden with glowing flowers and fantasy plants.",
            &["garden", "enchanted", "flowers", "magical", "nature"],
        ),
        BackgroundRecord::new(
            "bg14",
            "Stormy Sky",
            "Dramatic clouds with thunder and lightning.",
            &["storm", "clouds", "dramatic", "thunder", "intense"],
        ),
        BackgroundRecord::new(
            "bg15",
            "Cozy Cabin Interior",
            "Warm wooden cabin with fireplace glow.",
            &["cabin", "cozy", "warm", "home", "comfort"],
        ),
        BackgroundRecord::new(
            "bg16",
            "Tropical Jungle",
            "Dense green jungle with tropical plants.",
            &["jungle", "tropical", "adventure", "green", "wild"],
        ),
        BackgroundRecord::new(
            "bg17",
            "Floating Islands",
            "Fantasy floating islands in the sky with waterfalls.",
            &["floating", "islands", "fantasy", "dreamy", "surreal"],
        ),
        BackgroundRecord::new(
            "bg18",
            "Northern Lights",
            "Aurora borealis dancing over arctic landscape.",
            &["aurora", "northern lights", "night", "magical", "arctic"],
        ),
        BackgroundRecord::new(
            "bg19",
            "Candy Land",
            "Whimsical candy-themed landscape with sweets everywhere.",
            &["candy", "sweet", "colorful", "fun", "whimsical"],
        ),
        BackgroundRecord::new(
            "bg20",
            "Ancient Temple Ruins",
            "Mysterious ancient ruins with vines and stone.",
            &["ancient", "ruins", "history", "mystery", "adventure"],
        ),
    ]
}

/// The compiled-in catalog; the sunny meadow is the default scene.
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| Catalog::new(build_records(), 0))
}
