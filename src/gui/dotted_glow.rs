//! ドットグリッド背景のアニメーションモデル
//!
//! ウェルカム画面の装飾。グリッド上の各ドットが位相のずれた正弦波で明滅し、
//! 明るいドットにはグローがかかる。描画はSVG文字列として行う。

use std::f64::consts::PI;
use std::fmt::Write as _;

use rand::Rng;

use crate::gui::config_manager::ThemeConfig;

/// 1フレームあたりの時間の進み
pub const FRAME_STEP: f64 = 0.016;

/// グリッドの設定
#[derive(Debug, Clone, PartialEq)]
pub struct DotGridConfig {
    pub gap: f64,
    pub radius: f64,
    pub opacity: f64,
    /// 中央の放射グラデーションの濃さ（0で無効）
    pub background_opacity: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    pub speed_scale: f64,
    pub shadow_blur: f64,
}

impl Default for DotGridConfig {
    fn default() -> Self {
        Self {
            gap: 12.0,
            radius: 2.0,
            opacity: 0.6,
            background_opacity: 0.0,
            speed_min: 0.4,
            speed_max: 1.3,
            speed_scale: 1.0,
            shadow_blur: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed: f64,
    pub phase: f64,
}

/// 1フレーム分のドットの描画値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotFrame {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// 不透明度（設定のopacityを掛けた後の値）
    pub alpha: f64,
    pub glow: bool,
}

/// 明滅の明るさ（0.3〜1.0）
pub fn pulse_alpha(time: f64, speed: f64, phase: f64) -> f64 {
    0.3 + 0.7 * ((time * speed + phase).sin() * 0.5 + 0.5)
}

/// ドットグリッド
#[derive(Debug, Clone)]
pub struct DotGrid {
    config: DotGridConfig,
    width: f64,
    height: f64,
    dots: Vec<Dot>,
    time: f64,
}

impl DotGrid {
    pub fn new(config: DotGridConfig, width: f64, height: f64, rng: &mut impl Rng) -> Self {
        let mut grid = Self {
            config,
            width: 0.0,
            height: 0.0,
            dots: Vec::new(),
            time: 0.0,
        };
        grid.resize(width, height, rng);
        grid
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// サイズが変わったらグリッドを作り直す
    pub fn resize(&mut self, width: f64, height: f64, rng: &mut impl Rng) -> bool {
        let width = width.max(0.0);
        let height = height.max(0.0);
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;

        let gap = self.config.gap;
        if gap <= 0.0 {
            self.dots.clear();
            return true;
        }
        let cols = (width / gap).ceil() as usize;
        let rows = (height / gap).ceil() as usize;

        self.dots = (0..cols * rows)
            .map(|i| {
                let col = (i % cols) as f64;
                let row = (i / cols) as f64;
                let speed = if self.config.speed_max > self.config.speed_min {
                    rng.gen_range(self.config.speed_min..self.config.speed_max)
                } else {
                    self.config.speed_min
                };
                Dot {
                    x: col * gap + gap / 2.0,
                    y: row * gap + gap / 2.0,
                    radius: self.config.radius,
                    speed,
                    phase: rng.gen_range(0.0..PI * 2.0),
                }
            })
            .collect();
        true
    }

    /// 1フレーム進める
    pub fn tick(&mut self) {
        self.time += FRAME_STEP * self.config.speed_scale;
    }

    pub fn frame(&self) -> impl Iterator<Item = DotFrame> + '_ {
        self.dots.iter().map(move |dot| {
            let alpha = pulse_alpha(self.time, dot.speed, dot.phase);
            DotFrame {
                x: dot.x,
                y: dot.y,
                radius: dot.radius * (0.8 + 0.4 * alpha),
                alpha: self.config.opacity * alpha,
                glow: alpha > 0.7,
            }
        })
    }

    /// 現在のフレームをSVGとして出力
    pub fn render_svg(&self, colors: &ResolvedColors) -> String {
        let mut svg = String::with_capacity(self.dots.len() * 64 + 512);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" viewBox="0 0 {w} {h}" preserveAspectRatio="xMidYMid slice">"#,
            w = self.width,
            h = self.height
        );
        let _ = write!(
            svg,
            r#"<defs><filter id="dot-glow" x="-300%" y="-300%" width="700%" height="700%"><feDropShadow dx="0" dy="0" stdDeviation="{sd:.1}" flood-color="{glow}"/></filter>"#,
            sd = self.config.shadow_blur / 2.0,
            glow = colors.glow
        );
        if self.config.background_opacity > 0.0 {
            let _ = write!(
                svg,
                r#"<radialGradient id="dot-vignette"><stop offset="0" stop-color="rgb(0,0,0)" stop-opacity="{o}"/><stop offset="1" stop-color="rgb(0,0,0)" stop-opacity="0"/></radialGradient>"#,
                o = self.config.background_opacity
            );
        }
        svg.push_str("</defs>");

        let _ = write!(svg, r#"<g fill="{}">"#, colors.dot);
        for dot in self.frame() {
            let _ = write!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.2}" opacity="{:.3}"{}/>"#,
                dot.x,
                dot.y,
                dot.radius,
                dot.alpha,
                if dot.glow { r#" filter="url(#dot-glow)""# } else { "" }
            );
        }
        svg.push_str("</g>");

        if self.config.background_opacity > 0.0 {
            svg.push_str(r#"<rect width="100%" height="100%" fill="url(#dot-vignette)"/>"#);
        }
        svg.push_str("</svg>");
        svg
    }
}

/// `"H S% L%"` 形式のHSL値を `rgb(r, g, b)` に変換する
///
/// 3要素でない、または数値として読めない場合は入力をそのまま返す。
pub fn hsl_to_rgb(hsl: &str) -> String {
    let parts: Vec<&str> = hsl.split_whitespace().collect();
    let [h, s, l] = parts.as_slice() else {
        return hsl.to_string();
    };
    let (Some(h), Some(s), Some(l)) = (leading_int(h), leading_int(s), leading_int(l)) else {
        return hsl.to_string();
    };

    let (h, s, l) = (h as f64, s as f64 / 100.0, l as f64 / 100.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let channel = |v: f64| ((v + m) * 255.0).round() as i64;
    format!("rgb({}, {}, {})", channel(r), channel(g), channel(b))
}

/// 先頭の整数部分だけを読む（`"47%"` → 47）
fn leading_int(text: &str) -> Option<i64> {
    let end = text
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// ライト/ダークで切り替わる色の指定
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorSource {
    pub literal: String,
    pub dark_literal: Option<String>,
    /// テーマ変数（HSL値）。空なら無視
    pub light_var: Option<String>,
    pub dark_var: Option<String>,
}

impl ColorSource {
    pub fn literal(color: impl Into<String>) -> Self {
        Self {
            literal: color.into(),
            ..Self::default()
        }
    }

    /// テーマ変数を優先し、なければリテラル色を使う
    pub fn resolve(&self, dark: bool) -> String {
        let (var, fallback) = if dark {
            (
                self.dark_var.as_deref(),
                self.dark_literal.as_deref().unwrap_or(&self.literal),
            )
        } else {
            (self.light_var.as_deref(), self.literal.as_str())
        };
        match var.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => hsl_to_rgb(value),
            None => fallback.to_string(),
        }
    }
}

/// 解決済みの描画色
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColors {
    pub dot: String,
    pub glow: String,
}

/// ドットとグローの色指定
#[derive(Debug, Clone, PartialEq)]
pub struct GlowPalette {
    pub dot: ColorSource,
    pub glow: ColorSource,
}

impl Default for GlowPalette {
    fn default() -> Self {
        Self {
            dot: ColorSource::literal("rgba(0,0,0,0.7)"),
            glow: ColorSource::literal("rgba(0, 170, 255, 0.85)"),
        }
    }
}

impl GlowPalette {
    /// テーマ設定から色指定を組み立てる
    pub fn from_theme(theme: &ThemeConfig) -> Self {
        let mut palette = Self::default();
        palette.dot.dark_literal = Some("rgba(255,255,255,0.7)".to_string());

        // 直接指定の色はテーマ変数より優先する
        match &theme.dot_color {
            Some(color) => {
                palette.dot.literal = color.clone();
                palette.dot.dark_literal = Some(color.clone());
            }
            None => palette.dot.light_var = Some(theme.foreground.clone()),
        }
        match &theme.glow_color {
            Some(color) => palette.glow.literal = color.clone(),
            None => {
                palette.glow.light_var = Some(theme.accent.clone());
                palette.glow.dark_var = Some(theme.accent.clone());
            }
        }
        palette
    }

    pub fn resolve(&self, dark: bool) -> ResolvedColors {
        ResolvedColors {
            dot: self.dot.resolve(dark),
            glow: self.glow.resolve(dark),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(width: f64, height: f64) -> DotGrid {
        let mut rng = StdRng::seed_from_u64(7);
        DotGrid::new(DotGridConfig::default(), width, height, &mut rng)
    }

    #[test]
    fn test_grid_dimensions_round_up() {
        let grid = grid(25.0, 12.0);
        // 25/12 → 3列, 12/12 → 1行
        assert_eq!(grid.dots().len(), 3);
        assert_eq!((grid.dots()[0].x, grid.dots()[0].y), (6.0, 6.0));
        assert_eq!(grid.dots()[2].x, 30.0);
    }

    #[test]
    fn test_dot_speed_and_phase_ranges() {
        let grid = grid(240.0, 240.0);
        for dot in grid.dots() {
            assert!((0.4..1.3).contains(&dot.speed));
            assert!((0.0..PI * 2.0).contains(&dot.phase));
        }
    }

    #[test]
    fn test_resize_recomputes_only_on_change() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = DotGrid::new(DotGridConfig::default(), 24.0, 24.0, &mut rng);
        assert!(!grid.resize(24.0, 24.0, &mut rng));
        assert!(grid.resize(48.0, 24.0, &mut rng));
        assert_eq!(grid.dots().len(), 8);
    }

    #[test]
    fn test_pulse_alpha_bounds_and_glow_threshold() {
        assert!((pulse_alpha(0.0, 1.0, PI / 2.0) - 1.0).abs() < 1e-9);
        assert!((pulse_alpha(0.0, 1.0, -PI / 2.0) - 0.3).abs() < 1e-9);

        let mut grid = grid(120.0, 120.0);
        for _ in 0..30 {
            grid.tick();
        }
        assert!((grid.time() - 30.0 * FRAME_STEP).abs() < 1e-9);
        for frame in grid.frame() {
            let alpha = frame.alpha / 0.6;
            assert!((0.3 - 1e-9..=1.0 + 1e-9).contains(&alpha));
            assert_eq!(frame.glow, alpha > 0.7);
            assert!((frame.radius - 2.0 * (0.8 + 0.4 * alpha)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hsl_to_rgb() {
        assert_eq!(hsl_to_rgb("0 100% 50%"), "rgb(255, 0, 0)");
        assert_eq!(hsl_to_rgb("120 100% 50%"), "rgb(0, 255, 0)");
        assert_eq!(hsl_to_rgb("0 0% 100%"), "rgb(255, 255, 255)");
        assert_eq!(hsl_to_rgb("#ff0000"), "#ff0000");
        assert_eq!(hsl_to_rgb("a b c"), "a b c");
    }

    #[test]
    fn test_color_resolution_falls_back_to_literals() {
        let source = ColorSource {
            literal: "black".to_string(),
            dark_literal: Some("white".to_string()),
            light_var: Some("  ".to_string()),
            dark_var: None,
        };
        assert_eq!(source.resolve(false), "black");
        assert_eq!(source.resolve(true), "white");

        let themed = ColorSource {
            light_var: Some("0 100% 50%".to_string()),
            ..source
        };
        assert_eq!(themed.resolve(false), "rgb(255, 0, 0)");
    }

    #[test]
    fn test_palette_from_theme() {
        let theme = ThemeConfig::default();
        let colors = GlowPalette::from_theme(&theme).resolve(true);
        assert_eq!(colors.dot, "rgba(255,255,255,0.7)");
        assert_eq!(colors.glow, hsl_to_rgb("199 100% 50%"));

        let custom = ThemeConfig {
            dot_color: Some("tomato".to_string()),
            ..ThemeConfig::default()
        };
        let colors = GlowPalette::from_theme(&custom).resolve(false);
        assert_eq!(colors.dot, "tomato");
    }

    #[test]
    fn test_render_svg_contains_every_dot() {
        let grid = grid(36.0, 12.0);
        let svg = grid.render_svg(&GlowPalette::default().resolve(false));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("dot-vignette"));
    }
}
