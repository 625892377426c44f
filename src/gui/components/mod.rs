// Dioxus GUI Components Module

pub mod alert_banner;
pub mod bundle_panel;
pub mod bundle_preview;
pub mod chat_panel;
pub mod dotted_glow_background; // 背景アニメーション
pub mod main_window;
pub mod navbar;
pub mod optimize_panel;
pub mod product_grid;
pub mod stateful_button;
pub mod suggestion_preview;
pub mod tab_navigation;

pub use alert_banner::AlertBanner;
pub use bundle_panel::BundlePanel;
pub use bundle_preview::BundlePreviewCard;
pub use chat_panel::ChatPanel;
pub use dotted_glow_background::DottedGlowBackground;
pub use main_window::MainWindow;
pub use navbar::Navbar;
pub use optimize_panel::OptimizePanel;
pub use product_grid::ProductGrid;
pub use stateful_button::StatefulButton;
pub use suggestion_preview::SuggestionPreview;
pub use tab_navigation::{TabContent, TabNavigation};
