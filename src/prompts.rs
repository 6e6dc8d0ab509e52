pub const PRICING: &str = include_str!("../data/prompts/pricing.txt");
pub const BRAND: &str = include_str!("../data/prompts/brand.txt");

pub const DEFAULT_DESCRIPTION: &str = "Tidak ada deskripsi";
pub const DEFAULT_STORY: &str = "Pengrajin lokal dengan keahlian turun-temurun";

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

fn or_default<'a>(text: &'a str, default: &'a str) -> &'a str {
    if text.trim().is_empty() {
        default
    } else {
        text
    }
}

pub fn pricing_prompt(description: &str) -> String {
    render(
        PRICING,
        &[("description", or_default(description, DEFAULT_DESCRIPTION))],
    )
}

pub fn brand_prompt(story: &str) -> String {
    render(BRAND, &[("story", or_default(story, DEFAULT_STORY))])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_multiple_vars() {
        assert_eq!(
            render("{{a}} and {{b}}", &[("a", "cats"), ("b", "dogs")]),
            "cats and dogs"
        );
    }

    #[test]
    fn test_templates_have_placeholders() {
        assert!(PRICING.contains("{{description}}"));
        assert!(BRAND.contains("{{story}}"));
    }

    #[test]
    fn test_pricing_prompt_embeds_description() {
        let prompt = pricing_prompt("Tas rajut wol");
        assert!(prompt.contains("Deskripsi produk: Tas rajut wol"));
        assert!(prompt.contains("\"estimatedPrice\""));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_blank_inputs_fall_back_to_defaults() {
        assert!(pricing_prompt("").contains("Deskripsi produk: Tidak ada deskripsi"));
        assert!(brand_prompt("  \n").contains(
            "Cerita pengrajin: Pengrajin lokal dengan keahlian turun-temurun"
        ));
    }

    #[test]
    fn test_brand_prompt_lists_schema_fields() {
        let prompt = brand_prompt("Turun-temurun dari nenek");
        for field in ["brandNames", "taglines", "colorPalette", "uniqueSellingPoint"] {
            assert!(prompt.contains(field), "missing {}", field);
        }
    }
}
