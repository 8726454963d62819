mod color;
mod core;

pub use self::core::*;
pub use color::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex_6() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 255));
    }

    #[test]
    fn color_from_hex_8() {
        let c = Color::from_hex("#00000000").unwrap();
        assert_eq!(c, Color::from_rgba(0, 0, 0, 0));
        assert!(c.is_transparent());
    }

    #[test]
    fn color_from_hex_invalid() {
        assert!(Color::from_hex("zzzzzz").is_none());
        assert!(Color::from_hex("#abc").is_none());
        assert!(Color::from_hex("").is_none());
        assert!(Color::from_hex("#ééé").is_none());
    }

    #[test]
    fn color_to_hex_with_alpha() {
        let c = Color::from_rgba(255, 0, 128, 128);
        assert_eq!(c.to_hex(), "#ff008080");
        assert_eq!(Color::from_rgba(85, 85, 85, 255).to_hex(), "#555555");
    }

    #[test]
    fn platform_serializes_as_wire_identifiers() {
        assert_eq!(serde_json::to_string(&Platform::Mac).unwrap(), "\"darwin\"");
        assert_eq!(serde_json::to_string(&Platform::Windows).unwrap(), "\"win32\"");
        assert_eq!(serde_json::to_string(&Platform::Linux).unwrap(), "\"linux\"");
        let p: Platform = serde_json::from_str("\"win32\"").unwrap();
        assert_eq!(p, Platform::Windows);
    }

    #[test]
    fn platform_current_matches_display() {
        let p = Platform::current();
        assert_eq!(p.to_string(), p.as_str());
    }

    #[test]
    fn title_bar_overlay_camel_case() {
        let json = r##"{"color":"#00000000","symbolColor":"#cccccc","height":48}"##;
        let overlay: TitleBarOverlay = serde_json::from_str(json).unwrap();
        assert_eq!(overlay.symbol_color, "#cccccc");
        assert_eq!(overlay.height, Some(48));

        let (bg, fg) = overlay.colors().unwrap();
        assert!(bg.is_transparent());
        assert_eq!(fg, Color::from_rgba(0xcc, 0xcc, 0xcc, 255));
    }

    #[test]
    fn title_bar_overlay_height_optional() {
        let json = r##"{"color":"#000000","symbolColor":"#ffffff"}"##;
        let overlay: TitleBarOverlay = serde_json::from_str(json).unwrap();
        assert_eq!(overlay.height, None);
        assert!(!serde_json::to_string(&overlay).unwrap().contains("height"));
    }

    #[test]
    fn title_bar_overlay_bad_color() {
        let overlay = TitleBarOverlay {
            color: "red".into(),
            symbol_color: "#fff".into(),
            height: None,
        };
        assert!(overlay.colors().is_none());
    }

    #[test]
    fn window_state_round_trip() {
        let state = WindowState {
            maximized: true,
            platform: Platform::Linux,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"maximized":true,"platform":"linux"}"#);
        let back: WindowState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
