//! Static branding screen.

use super::{label, Anchor, FontSize, ScreenContent};

const TITLE: &str = "LT EMBEDDED LAB";
const SUBTITLE: &str = "ESP32 Weather Panel";
const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

pub fn build() -> ScreenContent {
    let mut content = ScreenContent::default();
    content.push(label(TITLE, Anchor::Center, (0, -24), FontSize::Title));
    content.push(label(SUBTITLE, Anchor::Center, (0, 12), FontSize::Body));
    content.push(label(VERSION, Anchor::BottomMid, (0, -12), FontSize::Small));
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::Widget;

    #[test]
    fn shows_the_branding() {
        let content = build();
        let texts: Vec<&str> = content
            .widgets
            .iter()
            .map(|w| match w {
                Widget::Label { text, .. } => text.as_str(),
                _ => "",
            })
            .collect();
        assert!(texts.contains(&TITLE));
        assert!(texts.contains(&SUBTITLE));
    }
}
