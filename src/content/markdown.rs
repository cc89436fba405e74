//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Color, Highlighter, Theme, ThemeSet};
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::HighlightConfig;

/// Markdown renderer with light/dark syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    light_name: String,
    dark_name: String,
    light: Theme,
    dark: Theme,
}

impl MarkdownRenderer {
    /// Create a renderer with the default theme pair
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &HighlightConfig) -> Self {
        let defaults = HighlightConfig::default();
        let theme_set = ThemeSet::load_defaults();
        let (light_name, light) = pick_theme(&theme_set, &config.light_theme, &defaults.light_theme);
        let (dark_name, dark) = pick_theme(&theme_set, &config.dark_theme, &defaults.dark_theme);

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            light_name,
            dark_name,
            light,
            dark,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // No YAML metadata blocks: front-matter is split off before rendering
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlockKind> = None;
        let mut code = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(kind);
                    code.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let html = match code_block.take() {
                        Some(CodeBlockKind::Fenced(info)) => {
                            self.highlight_code(&code, fence_language(&info))
                        }
                        _ => format!("<pre><code>{}</code></pre>\n", html_escape(&code)),
                    };
                    events.push(Event::Html(CowStr::from(html)));
                }
                Event::Text(text) if code_block.is_some() => code.push_str(&text),
                // Raw HTML in the source is not passed through
                Event::Html(_)
                | Event::InlineHtml(_)
                | Event::Start(Tag::HtmlBlock)
                | Event::End(TagEnd::HtmlBlock) => {}
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a fenced code block, falling back to plain escaped code
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("plaintext");
        match self.highlight_lines(code, lang) {
            Ok(lines) => format!(
                r#"<figure data-code-figure=""><pre data-language="{lang}" data-theme="{light} {dark}"><code data-language="{lang}">{body}</code></pre></figure>"#,
                lang = html_escape(lang),
                light = html_escape(&self.light_name),
                dark = html_escape(&self.dark_name),
                body = lines.join("\n"),
            ) + "\n",
            Err(e) => {
                tracing::warn!("Failed to highlight {} code block: {}", lang, e);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    html_escape(lang),
                    html_escape(code)
                ) + "\n"
            }
        }
    }

    /// Tokenize once and color every token with both themes
    fn highlight_lines(&self, code: &str, lang: &str) -> Result<Vec<String>> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let light = Highlighter::new(&self.light);
        let dark = Highlighter::new(&self.dark);
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(code) {
            let ops = state.parse_line(line, &self.syntax_set)?;
            let text = line.trim_end_matches(['\n', '\r']);
            let mut html = String::from(r#"<span data-line="">"#);
            let mut cursor = 0;

            for (pos, op) in ops {
                let pos = pos.min(text.len());
                if pos > cursor {
                    push_token(&mut html, &text[cursor..pos], &stack, &light, &dark);
                    cursor = pos;
                }
                stack.apply(&op)?;
            }
            if cursor < text.len() {
                push_token(&mut html, &text[cursor..], &stack, &light, &dark);
            }

            html.push_str("</span>");
            lines.push(html);
        }

        Ok(lines)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn pick_theme(theme_set: &ThemeSet, name: &str, fallback: &str) -> (String, Theme) {
    if let Some(theme) = theme_set.themes.get(name) {
        return (name.to_string(), theme.clone());
    }
    tracing::warn!("Unknown highlight theme {:?}, using {:?}", name, fallback);
    let theme = theme_set.themes.get(fallback).cloned().unwrap_or_default();
    (fallback.to_string(), theme)
}

/// Language token of a fence info string (`rust title="x"` -> `rust`)
fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next().filter(|l| !l.is_empty())
}

fn push_token(
    html: &mut String,
    text: &str,
    stack: &ScopeStack,
    light: &Highlighter,
    dark: &Highlighter,
) {
    if text.trim().is_empty() {
        html.push_str(&html_escape(text));
        return;
    }
    let light = light.style_for_stack(stack.as_slice()).foreground;
    let dark = dark.style_for_stack(stack.as_slice()).foreground;
    html.push_str(&format!(
        r#"<span style="--hl-light:{};--hl-dark:{}">{}</span>"#,
        hex(light),
        hex(dark),
        html_escape(text)
    ));
}

fn hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
