// Multi-language support module
// Provides localized UI strings for English and Chinese

#[derive(Clone, Debug)]
pub struct Assets {
    // Status line above the grid
    pub status_fmt: &'static str, // "Marked: {}  Total: {}"

    // Key help below the grid
    pub help_line: &'static str,

    // End of game
    pub win_message: &'static str,
    pub loss_message: &'static str,

    // Startup errors
    pub err_not_a_tty: &'static str,
    pub err_setup_fmt: &'static str, // "Cannot start game: {}"
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        status_fmt: "Marked: {}  Total: {}",
        help_line: "wasd/arrows move  f flag  space open  q quit",
        win_message: "You won!",
        loss_message: "That was a mine! Game over.",
        err_not_a_tty: "Must be run in a terminal",
        err_setup_fmt: "Cannot start game: {}",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        status_fmt: "已标记：{}  总数：{}",
        help_line: "wasd/方向键 移动  f 标记  空格 翻开  q 退出",
        win_message: "你赢了！",
        loss_message: "踩到地雷了！游戏结束。",
        err_not_a_tty: "必须在终端中运行",
        err_setup_fmt: "无法开始游戏：{}",
    }
}

/// Holds the active string assets
pub struct Lang {
    pub assets: Assets,
}

impl Lang {
    /// Creates a new Lang instance from a language code
    /// Normalizes input (e.g., "zh-CN" → "zh") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let code = if lang_code.to_lowercase().starts_with("zh") {
            "zh"
        } else {
            "en"
        };

        Lang {
            assets: if code == "zh" {
                chinese_assets()
            } else {
                english_assets()
            },
        }
    }

    pub fn status_line(&self, flagged: usize, total: usize) -> String {
        self.assets
            .status_fmt
            .replacen("{}", &flagged.to_string(), 1)
            .replacen("{}", &total.to_string(), 1)
    }

    pub fn setup_error(&self, reason: &dyn std::fmt::Display) -> String {
        self.assets.err_setup_fmt.replacen("{}", &reason.to_string(), 1)
    }
}
