//! 一文字ずつ表示するフック

use std::time::Duration;

use dioxus::core::Task;
use dioxus::prelude::*;

use crate::gui::typewriter::{Typewriter, CHARS_PER_TICK, TICK_MS};

/// `message_id` が変わるたびに先頭から表示し直す
///
/// 進行中の表示は新しいメッセージで打ち切られる。タスクはコンポーネントの
/// スコープに属するので、アンマウント時にも止まる。
pub fn use_typewriter(message_id: String, text: String) -> Signal<String> {
    let mut visible = use_signal(String::new);
    let mut running = use_signal(|| None::<(String, Task)>);

    use_effect(use_reactive!(|(message_id, text)| {
        if let Some((current_id, task)) = running.peek().as_ref() {
            if *current_id == message_id {
                return;
            }
            task.cancel();
        }

        let task = spawn(async move {
            let mut model = Typewriter::new(text);
            visible.set(String::new());
            while !model.advance(CHARS_PER_TICK) {
                visible.set(model.visible_text().to_string());
                tokio::time::sleep(Duration::from_millis(TICK_MS)).await;
            }
            visible.set(model.visible_text().to_string());
        });
        running.set(Some((message_id, task)));
    }));

    visible
}
