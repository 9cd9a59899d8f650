//! HTML rendering for the terminal UI

use moodlog_core::{LogEntry, Result, StressIndicator, TemplateEngine};
use serde::Serialize;

/// Navigation tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Logs,
    Voice,
    Scrapbook,
    Mirror,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Logs, Tab::Voice, Tab::Scrapbook, Tab::Mirror];

    /// Tab named in `?tab=`; anything unknown lands on the daily log
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("voice") => Tab::Voice,
            Some("scrapbook") => Tab::Scrapbook,
            Some("mirror") => Tab::Mirror,
            _ => Tab::Logs,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Tab::Logs => "logs",
            Tab::Voice => "voice",
            Tab::Scrapbook => "scrapbook",
            Tab::Mirror => "mirror",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Logs => "Daily Logs",
            Tab::Voice => "Voice Phone",
            Tab::Scrapbook => "Scrapbook",
            Tab::Mirror => "Face Mirror",
        }
    }
}

/// Severity of a status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Warning,
    Error,
}

/// One-line message shown above the tab body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Warning,
            message: message.into(),
        }
    }
}

/// Log card content plus the accent color it is drawn with
#[derive(Debug, Clone)]
pub struct Card {
    pub entry: LogEntry,
    pub color: &'static str,
}

/// Everything one page render needs
#[derive(Debug, Clone)]
pub struct PageView {
    pub tab: Tab,
    pub indicator: StressIndicator,
    pub card: Option<Card>,
    pub banner: Option<Banner>,
    pub logs_enabled: bool,
}

impl PageView {
    pub fn new(tab: Tab, indicator: StressIndicator) -> Self {
        Self {
            tab,
            indicator,
            card: None,
            banner: None,
            logs_enabled: false,
        }
    }

    pub fn with_card(mut self, card: Option<Card>) -> Self {
        self.card = card;
        self
    }

    pub fn with_banner(mut self, banner: Option<Banner>) -> Self {
        self.banner = banner;
        self
    }
}

#[derive(Serialize)]
struct StressometerData<'a> {
    color: &'a str,
    theme: &'a str,
    emoji: &'a str,
    label: &'a str,
    level: String,
    bar_height: String,
    load_percent: i64,
}

#[derive(Serialize)]
struct CardData<'a> {
    title: &'a str,
    emotion: &'a str,
    reply: &'a str,
    color: &'a str,
}

#[derive(Serialize)]
struct NavItem {
    slug: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct PageData<'a> {
    css: &'static str,
    stressometer: String,
    nav: Vec<NavItem>,
    color: &'a str,
    shake: bool,
    tab: &'static str,
    banner: Option<&'a Banner>,
    card: Option<String>,
    logs_enabled: bool,
}

/// Registered page templates
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("stressometer", STRESSOMETER_TEMPLATE)?;
        engine.register_template("log_card", LOG_CARD_TEMPLATE)?;
        engine.register_template("page", PAGE_TEMPLATE)?;
        Ok(Self { engine })
    }

    /// Sidebar gauge
    pub fn stressometer(&self, indicator: &StressIndicator) -> Result<String> {
        self.engine.render_named(
            "stressometer",
            &StressometerData {
                color: indicator.color,
                theme: indicator.theme,
                emoji: indicator.emoji,
                label: indicator.label,
                level: format!("{:.1}", indicator.score),
                bar_height: format!("{:.1}", indicator.bar_height),
                load_percent: indicator.load_percent,
            },
        )
    }

    /// Result card for one classified interaction
    pub fn log_card(&self, card: &Card) -> Result<String> {
        self.engine.render_named(
            "log_card",
            &CardData {
                title: card.entry.modality.title(),
                emotion: card.entry.emotion.as_str(),
                reply: &card.entry.reply,
                color: card.color,
            },
        )
    }

    /// Full page
    pub fn page(&self, view: &PageView) -> Result<String> {
        let card = match &view.card {
            Some(card) => Some(self.log_card(card)?),
            None => None,
        };
        let nav = Tab::ALL
            .iter()
            .map(|t| NavItem {
                slug: t.slug(),
                label: t.label(),
                selected: *t == view.tab,
            })
            .collect();
        self.engine.render_named(
            "page",
            &PageData {
                css: STYLE_CSS,
                stressometer: self.stressometer(&view.indicator)?,
                nav,
                color: view.indicator.color,
                shake: moodlog_core::is_critical_shake(view.indicator.score),
                tab: view.tab.slug(),
                banner: view.banner.as_ref(),
                card,
                logs_enabled: view.logs_enabled,
            },
        )
    }
}

const STRESSOMETER_TEMPLATE: &str = r#"<div class="stress-box" style="border-color:{{color}};">
  <div class="stress-title">STRESSOMETER</div>
  <div class="stress-row">
    <div class="emoji-box {{theme}}">{{emoji}}</div>
    <div class="v-bar-bg {{theme}}">
      <div class="v-bar-fill" style="height:{{bar_height}}%;"></div>
    </div>
    <div class="stats-box {{theme}}">
      <div class="stat-label">{{label}}</div>
      <div class="stat-sub">LVL: {{level}}</div>
      <div class="stat-sub">LOAD: {{load_percent}}%</div>
    </div>
  </div>
</div>"#;

const LOG_CARD_TEMPLATE: &str = r#"<div class="log-card" style="border-left-color: {{color}};">
  <div class="log-head" style="color:{{color}};">
    <span>&gt; {{title}}</span>
    <span>{{uppercase emotion}}</span>
  </div>
  <hr class="log-rule">
  <div class="log-reply">"{{reply}}"</div>
</div>"#;

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>SYSTEM LOGS</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>📼</text></svg>">
<link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=VT323&display=swap">
<style>{{{css}}}</style>
{{#if shake}}<style>.app { animation: shake 0.5s infinite; }</style>{{/if}}
</head>
<body>
<div class="app">
  <aside class="sidebar">
    {{{stressometer}}}
    <hr class="divider">
    <div class="caption">SYSTEM: ONLINE</div>
  </aside>
  <main class="main">
    <nav class="nav">
      {{#each nav}}<a class="nav-link{{#if selected}} selected{{/if}}" href="/?tab={{slug}}"{{#if selected}} style="color:{{../color}}; border:1px solid {{../color}};"{{/if}}>{{label}}</a>{{/each}}
    </nav>
    {{#if banner}}<div class="banner banner-{{banner.kind}}">{{banner.message}}</div>{{/if}}
    {{#if (eq tab "logs")}}
    <section class="tab tab-logs">
      <div class="col-wide">
        <h3>🖊️ NEW ENTRY</h3>
        <form method="post" action="/log/text">
          <textarea name="text" rows="7" placeholder="..."></textarea>
          <button type="submit">LOG ENTRY</button>
        </form>
        {{{card}}}
      </div>
    </section>
    {{/if}}
    {{#if (eq tab "voice")}}
    <section class="tab tab-voice">
      <div class="phone" style="border:2px solid {{color}};">
        <h3 class="center">LEAVE MESSAGE</h3>
        <form method="post" action="/log/voice" enctype="multipart/form-data">
          <label class="upload">RECORD <input type="file" name="audio" accept="audio/wav,.wav" capture="user"></label>
          <button type="submit">SEND</button>
        </form>
        {{{card}}}
      </div>
    </section>
    {{/if}}
    {{#if (eq tab "scrapbook")}}
    <section class="tab tab-scrapbook">
      <h3>📎 FILE READER</h3>
      <form method="post" action="/log/document" enctype="multipart/form-data">
        <label class="upload">UPLOAD <input type="file" name="file" accept=".png,.jpg,.jpeg,.pdf"></label>
        <button type="submit">SCAN</button>
      </form>
      {{{card}}}
    </section>
    {{/if}}
    {{#if (eq tab "mirror")}}
    <section class="tab tab-mirror">
      <h3>🪞 REFLECTION</h3>
      <div class="cols">
        <form method="post" action="/log/face" enctype="multipart/form-data">
          <label class="upload">LOOK <input type="file" name="snapshot" accept="image/*" capture="user"></label>
          <button type="submit">SCAN FACE</button>
        </form>
        <div>{{{card}}}</div>
      </div>
    </section>
    {{/if}}
    {{#if logs_enabled}}<pre id="syslog" class="syslog"></pre>
    <script>
      const es = new EventSource('/logs');
      const out = document.getElementById('syslog');
      es.onmessage = (m) => {
        try {
          const ev = JSON.parse(m.data);
          out.textContent = (`[${ev.level}] ${ev.message}\n` + out.textContent).slice(0, 8000);
        } catch (_) {}
      };
    </script>{{/if}}
  </main>
</div>
</body>
</html>"#;

const STYLE_CSS: &str = r#"
html, body { margin: 0; background: #000; color: #33ff33; font-family: 'VT323', monospace; font-size: 20px; }
body::after { content: ""; position: fixed; inset: 0; pointer-events: none;
  background: repeating-linear-gradient(0deg, rgba(0,0,0,0.25) 0 1px, transparent 1px 3px); }
.app { display: flex; min-height: 100vh; }
.sidebar { width: 300px; padding: 20px; background: #050505; border-right: 1px solid #222; }
.main { flex: 1; padding: 20px 40px; }
.divider { border: 0; border-top: 1px solid #333; margin: 20px 0; }
.caption { color: #777; font-size: 16px; }
.stress-box { border: 2px solid; padding: 15px; background: #000; text-align: center; }
.stress-title { margin-bottom: 10px; letter-spacing: 2px; font-size: 20px; }
.stress-row { display: flex; align-items: stretch; justify-content: space-between; gap: 10px; }
.emoji-box { font-size: 48px; display: flex; align-items: center; }
.v-bar-bg { width: 24px; height: 120px; border: 1px solid currentColor; position: relative; background: #111; }
.v-bar-fill { position: absolute; bottom: 0; left: 0; right: 0; background: currentColor; }
.stats-box { text-align: left; display: flex; flex-direction: column; justify-content: center; }
.stat-label { font-size: 28px; }
.stat-sub { font-size: 18px; opacity: 0.8; }
.s-zen { color: #00ff00; } .s-happy { color: #ffff00; } .s-neutral { color: #ffffff; }
.s-warn { color: #ff8800; } .s-crit { color: #ff0000; }
.nav { display: flex; gap: 8px; background: #000; margin-bottom: 20px; }
.nav-link { color: #33ff33; text-decoration: none; padding: 6px 16px; font-size: 20px; border: 1px solid transparent; }
.nav-link.selected { background: #222; }
.banner { padding: 10px 14px; margin-bottom: 16px; border: 1px solid; }
.banner-error { color: #ff4444; border-color: #ff4444; background: #1a0000; }
.banner-warning { color: #ffcc00; border-color: #ffcc00; background: #1a1400; }
textarea { width: 100%; background: #050505; color: #33ff33; border: 1px solid #333; font: inherit; padding: 8px; box-sizing: border-box; }
button { margin-top: 10px; background: #000; color: #33ff33; border: 1px solid #33ff33; font: inherit; padding: 4px 18px; cursor: pointer; }
button:hover { background: #33ff33; color: #000; }
.upload { display: block; margin: 10px 0; }
.col-wide { max-width: 66%; }
.phone { max-width: 520px; margin: 20px auto; padding: 20px; background: #050505; }
.center { text-align: center; }
.cols { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
.log-card { border-left: 4px solid; background: #0a0a0a; padding: 12px 16px; margin-top: 20px; }
.log-head { display: flex; justify-content: space-between; }
.log-rule { border-color: #333; margin: 5px 0; opacity: 0.3; }
.log-reply { color: #eee; line-height: 1.4; }
.syslog { margin-top: 30px; max-height: 200px; overflow: auto; color: #555; font-size: 14px; }
@keyframes shake {
  0% { transform: translate(1px, 1px) rotate(0deg); }
  20% { transform: translate(-2px, 0px) rotate(1deg); }
  40% { transform: translate(1px, -1px) rotate(1deg); }
  60% { transform: translate(-2px, 1px) rotate(0deg); }
  80% { transform: translate(-1px, -1px) rotate(1deg); }
  100% { transform: translate(1px, -2px) rotate(-1deg); }
}
"#;
