//! アシスタント発言の一文字ずつの表示
//!
//! 表示上の演出のみ。新しい発言が来たら進行中の表示は打ち切られる。

/// 1ステップあたりの間隔（ミリ秒）
pub const TICK_MS: u64 = 15;

/// 1ステップで表示する文字数
pub const CHARS_PER_TICK: usize = 2;

/// 表示の進行状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    text: String,
    total_chars: usize,
    revealed: usize,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            total_chars: text.chars().count(),
            text,
            revealed: 0,
        }
    }

    /// `chars` 文字進め、全文表示済みなら true
    pub fn advance(&mut self, chars: usize) -> bool {
        self.revealed = (self.revealed + chars).min(self.total_chars);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.revealed >= self.total_chars
    }

    /// 即座に全文を表示
    pub fn finish(&mut self) {
        self.revealed = self.total_chars;
    }

    /// 現在表示されている部分（文字境界で切る）
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.revealed) {
            Some((byte_index, _)) => &self.text[..byte_index],
            None => &self.text,
        }
    }
}
