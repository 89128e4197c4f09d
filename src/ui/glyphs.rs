#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub selected: &'static str,
    pub unselected: &'static str,
    pub cursor: &'static str,
    pub search: &'static str,
    pub h_separator: &'static str,
    pub arrow_up: &'static str,
    pub arrow_down: &'static str,
    pub ellipsis: &'static str,
}

pub fn select(fancy_requested: bool) -> Glyphs {
    if fancy_requested {
        fancy()
    } else {
        ascii()
    }
}

fn ascii() -> Glyphs {
    Glyphs {
        selected: "> ",
        unselected: "  ",
        cursor: "_",
        search: "/",
        h_separator: "-",
        arrow_up: "^",
        arrow_down: "v",
        ellipsis: "~",
    }
}

fn fancy() -> Glyphs {
    Glyphs {
        selected: "▶ ",
        unselected: "  ",
        cursor: "█",
        search: "⌕",
        h_separator: "─",
        arrow_up: "↑",
        arrow_down: "↓",
        ellipsis: "…",
    }
}
