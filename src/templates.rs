//! Poster style templates
//!
//! Each template turns a free-text product description into a
//! style-specific instruction for the image model. The table is fixed
//! at compile time.

/// A named poster style
#[derive(Debug, Clone, Copy)]
pub struct StyleTemplate {
    /// Name clients send as `templateName`
    pub name: &'static str,
    prefix: &'static str,
    suffix: &'static str,
}

impl StyleTemplate {
    /// Render the final prompt for a product description
    pub fn prompt(&self, description: &str) -> String {
        format!("{}{}{}", self.prefix, description, self.suffix)
    }
}

/// All known templates, in display order
pub static TEMPLATES: [StyleTemplate; 3] = [
    StyleTemplate {
        name: "Elegant Studio",
        prefix: "Generate a professional, high-end studio product advertisement poster. \
                 Use a clean, minimalist white or gray background, subtle lighting, and \
                 elegant, modern Poppins-style typography. The product is: ",
        suffix: ". Include a short, punchy marketing caption on the image. Output only the image.",
    },
    StyleTemplate {
        name: "Warm Bakery",
        prefix: "Design a cozy, rustic, and warm bakery advertisement poster. Use soft, \
                 golden lighting, wood textures, and a handwritten-style font. The product is: ",
        suffix: ". Include a caption like 'Freshly Baked' or 'Taste the Warmth'. Output only the image.",
    },
    StyleTemplate {
        name: "Vibrant Market",
        prefix: "Create an energetic and colorful open-air market poster. Use bright, \
                 contrasting colors (like Sky Blue/Yellow) and a bold, African-inspired \
                 geometric pattern border. The product is: ",
        suffix: ". The image should convey freshness and local hustle. Output only the image.",
    },
];

/// Look up a template by exact name
pub fn find(name: &str) -> Option<&'static StyleTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}

/// Names of all templates
pub fn names() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.name).collect()
}
