//! Inline style extraction for layout.
//!
//! Only the handful of box properties that move section offsets are read from
//! `style=""`; everything visual is ignored.

/// Layout-relevant properties from an inline style attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleProps {
    pub height: Option<f32>,
    pub min_height: Option<f32>,
    pub margin_top: Option<f32>,
    pub margin_bottom: Option<f32>,
    pub font_size: Option<f32>,
    pub display_none: bool,
}

/// Parse an inline `style="..."` attribute value.
pub fn parse_inline_style(style: &str) -> StyleProps {
    let mut props = StyleProps::default();
    for decl in style.split(';') {
        let parts: Vec<&str> = decl.splitn(2, ':').collect();
        if parts.len() != 2 {
            continue;
        }
        let prop = parts[0].trim().to_lowercase();
        let val = parts[1].trim();
        match prop.as_str() {
            "height" => props.height = parse_css_size(val),
            "min-height" => props.min_height = parse_css_size(val),
            "margin-top" => props.margin_top = parse_css_size(val),
            "margin-bottom" => props.margin_bottom = parse_css_size(val),
            "margin" => {
                // `margin: <v>` or `margin: <top/bottom> <left/right>`
                let first = val.split_whitespace().next().and_then(parse_css_size);
                props.margin_top = first;
                props.margin_bottom = first;
            }
            "font-size" => props.font_size = parse_css_size(val),
            "display" => props.display_none = val.eq_ignore_ascii_case("none"),
            _ => {}
        }
    }
    props
}

/// Parse a CSS size value (px, em/rem at 16px, or a plain number).
pub fn parse_css_size(val: &str) -> Option<f32> {
    let v = val.trim().to_lowercase();
    if let Some(num) = v.strip_suffix("rem").or_else(|| v.strip_suffix("em")) {
        return num.trim().parse::<f32>().ok().map(|n| n * 16.0);
    }
    v.trim_end_matches("px").trim().parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sizes() {
        assert_eq!(parse_css_size("120px"), Some(120.0));
        assert_eq!(parse_css_size("2rem"), Some(32.0));
        assert_eq!(parse_css_size("1.5em"), Some(24.0));
        assert_eq!(parse_css_size("40"), Some(40.0));
        assert_eq!(parse_css_size("auto"), None);
    }

    #[test]
    fn parse_inline() {
        let props = parse_inline_style("height: 600px; margin: 8px 0; color: red; DISPLAY: none");
        assert_eq!(props.height, Some(600.0));
        assert_eq!(props.margin_top, Some(8.0));
        assert_eq!(props.margin_bottom, Some(8.0));
        assert!(props.display_none);
        assert_eq!(props.font_size, None);
    }

    #[test]
    fn malformed_declarations_are_skipped() {
        let props = parse_inline_style("height; min-height: 300px;;");
        assert_eq!(props.height, None);
        assert_eq!(props.min_height, Some(300.0));
    }
}
