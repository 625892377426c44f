use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::gui::{
    config_manager::ThemeConfig,
    dotted_glow::{DotGrid, DotGridConfig, GlowPalette},
    styles::theme::CssClasses,
};
use dioxus::prelude::*;

/// フレーム間隔（約60fps）
const FRAME_INTERVAL_MS: u64 = 16;

/// 明滅するドットグリッドの背景
///
/// 要素のサイズ変更でグリッドを作り直し、アンマウントでアニメーションを止める。
#[component]
pub fn DottedGlowBackground(#[props(default)] config: Option<DotGridConfig>) -> Element {
    let theme = try_use_context::<ThemeConfig>().unwrap_or_default();
    let mut size = use_signal(|| (0.0_f64, 0.0_f64));
    let mut svg = use_signal(String::new);

    use_future(move || {
        let mut grid_config = config.clone().unwrap_or_default();
        if let Some(opacity) = theme.background_opacity {
            grid_config.background_opacity = opacity;
        }
        let colors = GlowPalette::from_theme(&theme).resolve(theme.dark_mode);
        async move {
            let mut rng = StdRng::from_entropy();
            let mut grid = DotGrid::new(grid_config, 0.0, 0.0, &mut rng);
            let mut ticker = tokio::time::interval(Duration::from_millis(FRAME_INTERVAL_MS));
            loop {
                ticker.tick().await;
                let (width, height) = *size.peek();
                if grid.resize(width, height, &mut rng) {
                    tracing::debug!(width, height, dots = grid.dots().len(), "🔵 Dot grid rebuilt");
                }
                grid.tick();
                svg.set(grid.render_svg(&colors));
            }
        }
    });

    rsx! {
        div {
            class: CssClasses::WELCOME_BACKGROUND,
            onresize: move |event| {
                if let Ok(box_size) = event.get_content_box_size() {
                    size.set((box_size.width, box_size.height));
                }
            },
            dangerous_inner_html: "{svg}",
        }
    }
}
