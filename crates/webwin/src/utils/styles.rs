use anstyle::{AnsiColor, Color, RgbColor, Style};
use clap::builder::Styles;

use crate::utils::{CHECK, MARK};

const ACCENT: RgbColor = RgbColor(176, 96, 16); // #B06010
const MUTED: RgbColor = RgbColor(46, 110, 92); // #2E6E5C

pub(crate) fn get_styles() -> Styles {
    Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Rgb(ACCENT))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Rgb(ACCENT))),
        )
        .literal(Style::new().fg_color(Some(Color::Rgb(MUTED))))
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Rgb(MUTED))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

fn fmt_style(msg: &str, style: &Style) -> String {
    format!("{style}{msg}{style:#}")
}

pub(crate) fn fmt_bold(msg: &str) -> String {
    fmt_style(msg, &Style::new().bold())
}

pub(crate) fn fmt_dimmed(msg: &str) -> String {
    fmt_style(msg, &Style::new().dimmed())
}

pub(crate) fn fmt_success(msg: &str) -> String {
    let check = fmt_style(CHECK, &Style::new().fg_color(Some(Color::Rgb(MUTED))));
    format!("{check} {msg}")
}

pub(crate) fn fmt_error(msg: &str) -> String {
    let mark = fmt_style(MARK, &Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))));
    format!("{mark} {msg}")
}
