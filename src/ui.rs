use crate::config::TariffConfig;
use crate::countdown::Countdown;
use crate::models::{
    ChartPoint, ConsumptionRecord, ConsumptionSummary, HistoryRow, InventoryItem, DEFAULT_WATTS,
};
use crate::stats::{
    chart_points, format_active_time, format_cost, format_kwh, history_rows, summarize,
};

#[derive(Debug)]
pub struct DashboardView {
    // None until the collector has written a block
    pub summary: Option<ConsumptionSummary>,
    pub chart: Vec<ChartPoint>,
    pub history: Vec<HistoryRow>,
    pub countdown: Countdown,
    pub inventory: Vec<InventoryItem>,
}

impl DashboardView {
    pub fn new(
        records: &[ConsumptionRecord],
        inventory: Vec<InventoryItem>,
        tariff: &TariffConfig,
        countdown: Countdown,
    ) -> Self {
        let summary = (!records.is_empty()).then(|| summarize(records, tariff));
        Self {
            summary,
            chart: chart_points(records),
            history: history_rows(records),
            countdown,
            inventory,
        }
    }
}

pub fn render_index(view: &DashboardView) -> String {
    INDEX_HTML
        .replace("{{COUNTDOWN}}", &render_countdown(view.countdown))
        .replace("{{DEFAULT_WATTS}}", &DEFAULT_WATTS.to_string())
        .replace("{{MAIN}}", &render_main(view))
        .replace("{{INVENTORY}}", &render_inventory(&view.inventory))
}

fn render_countdown(countdown: Countdown) -> String {
    match countdown {
        Countdown::Active { seconds } => COUNTDOWN_HTML.replace("{{SECONDS}}", &seconds.to_string()),
        Countdown::Unavailable => {
            r#"<div class="alert error">Error de sincronización del reloj</div>"#.to_string()
        }
        Countdown::NoData | Countdown::Expired => String::new(),
    }
}

fn render_inventory(items: &[InventoryItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let rows: String = items
        .iter()
        .map(|item| format!("<tr><td>{}</td><td>{}</td></tr>", escape_html(&item.aparato), item.watts))
        .collect();
    format!(
        r#"<table class="grid inventory"><thead><tr><th>aparato</th><th>watts</th></tr></thead><tbody>{rows}</tbody></table>"#
    )
}

fn render_main(view: &DashboardView) -> String {
    let Some(summary) = &view.summary else {
        return r#"<div class="alert info">Esperando datos del Vigilante...</div>"#.to_string();
    };

    let metrics = [
        ("Total Consumido", format_kwh(summary.total_kwh)),
        ("Gasto Estimado", format_cost(summary.estimated_cost)),
        ("Sesiones", summary.sessions.to_string()),
        ("Tiempo Activo", format_active_time(summary.active_seconds)),
    ];
    let cards: String = metrics
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="stat"><span class="label">{label}</span><span class="value">{}</span></div>"#,
                escape_html(value)
            )
        })
        .collect();

    let chart_data = serde_json::to_string(&view.chart).unwrap_or_else(|_| "[]".to_string());

    MAIN_HTML
        .replace("{{METRICS}}", &cards)
        .replace("{{CHART_DATA}}", &chart_data)
        .replace("{{HISTORY}}", &render_history(&view.history))
}

fn render_history(rows: &[HistoryRow]) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.id,
                escape_html(&row.fecha),
                escape_html(&row.hora_inicio),
                escape_html(&row.hora_fin),
                row.kwh_consumidos,
                escape_html(&row.cpu),
                escape_html(&row.gpu),
            )
        })
        .collect();
    format!(
        r#"<table class="grid history"><thead><tr><th>id</th><th>fecha</th><th>hora_inicio</th><th>hora_fin</th><th>kwh_consumidos</th><th>CPU %</th><th>GPU %</th></tr></thead><tbody>{body}</tbody></table>"#
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const COUNTDOWN_HTML: &str = r#"<section class="countdown">
        <h3>⏳ Tiempo para el próximo depósito</h3>
        <div id="timer" class="timer" data-seconds="{{SECONDS}}">00:00</div>
      </section>
      <script>
        (() => {
          const timerEl = document.getElementById('timer');
          let timeLeft = Number(timerEl.dataset.seconds);
          const pad = (value) => (value < 10 ? '0' : '') + value;
          const tick = () => {
            if (timeLeft <= 0) {
              window.location.reload();
              return;
            }
            timerEl.textContent = pad(Math.floor(timeLeft / 60)) + ':' + pad(timeLeft % 60);
            timeLeft -= 1;
          };
          tick();
          setInterval(tick, 1000);
        })();
      </script>"#;

const MAIN_HTML: &str = r#"<section class="panel">{{METRICS}}</section>

      <section class="chart-area">
        <h2>Consumo por Bloques de 15 min</h2>
        <div class="chart-card">
          <svg id="chart" viewBox="0 0 720 300" aria-label="kWh por bloque" role="img"></svg>
        </div>
      </section>

      <section>
        <h2>📋 Detalle Histórico</h2>
        <div class="table-wrap">{{HISTORY}}</div>
      </section>

      <script>
        (() => {
          const points = {{CHART_DATA}};
          const chartEl = document.getElementById('chart');

          const formatAxisValue = (value) => {
            const rounded = Math.round(value * 1000) / 1000;
            return rounded.toString();
          };

          const width = 720;
          const height = 300;
          const paddingX = 56;
          const paddingY = 36;
          const top = 20;

          let max = Math.max(0, ...points.map((point) => point.kwh));
          if (max === 0) {
            max = 1;
          }

          const slot = (width - paddingX * 2) / points.length;
          const barWidth = Math.max(2, slot * 0.7);
          const scaleY = (height - top - paddingY) / max;
          const x = (index) => paddingX + index * slot + (slot - barWidth) / 2;
          const y = (value) => height - paddingY - value * scaleY;

          const ticks = 4;
          let grid = '';
          for (let i = 0; i <= ticks; i += 1) {
            const value = (max * i) / ticks;
            const yPos = y(value);
            grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
            grid += `<text class="chart-label" x="${paddingX - 8}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
          }

          const labelEvery = Math.max(1, Math.ceil(points.length / 12));
          const bars = points
            .map((point, index) => {
              const barTop = y(point.kwh);
              const label = index % labelEvery === 0
                ? `<text class="chart-label" x="${x(index) + barWidth / 2}" y="${height - paddingY + 16}" text-anchor="middle">${point.id}</text>`
                : '';
              return `<rect class="chart-bar" x="${x(index)}" y="${barTop}" width="${barWidth}" height="${height - paddingY - barTop}"><title>id ${point.id}: ${point.kwh} kWh</title></rect>${label}`;
            })
            .join('');

          chartEl.innerHTML = `${grid}${bars}`;
        })();
      </script>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Energy-Logic Dashboard</title>
  <style>
    :root {
      --bg: #0e1117;
      --panel: #161b22;
      --border: #30363d;
      --ink: #e6edf3;
      --muted: #8b949e;
      --accent: #00d4ff;
      --danger: #f85149;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Source Sans Pro", "Segoe UI", sans-serif;
      display: grid;
      grid-template-columns: 300px 1fr;
    }

    aside {
      background: var(--panel);
      border-right: 1px solid var(--border);
      padding: 28px 20px;
      display: grid;
      align-content: start;
      gap: 20px;
    }

    main {
      padding: 32px 40px 48px;
      display: grid;
      align-content: start;
      gap: 28px;
      animation: rise 600ms ease;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 3vw, 2.4rem);
    }

    h2, h3 {
      margin: 0 0 12px;
    }

    hr {
      border: none;
      border-top: 1px solid var(--border);
      width: 100%;
    }

    .timer {
      color: var(--accent);
      font-size: 32px;
      font-weight: bold;
      background: var(--bg);
      padding: 15px;
      border-radius: 10px;
      text-align: center;
      border: 1px solid var(--border);
    }

    .alert {
      border-radius: 10px;
      padding: 14px 16px;
    }

    .alert.info {
      background: rgba(0, 212, 255, 0.12);
      color: var(--accent);
    }

    .alert.error {
      background: rgba(248, 81, 73, 0.14);
      color: var(--danger);
    }

    form {
      display: grid;
      gap: 10px;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    input {
      background: var(--bg);
      color: var(--ink);
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 10px;
      font-size: 1rem;
    }

    button {
      appearance: none;
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 10px 16px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--panel);
      color: var(--ink);
    }

    button:hover {
      border-color: var(--accent);
      color: var(--accent);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: var(--panel);
      border-radius: 12px;
      padding: 18px;
      border: 1px solid var(--border);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
    }

    .chart-card {
      background: var(--panel);
      border-radius: 12px;
      padding: 16px;
      border: 1px solid var(--border);
    }

    #chart {
      width: 100%;
      height: 300px;
      display: block;
    }

    .chart-bar {
      fill: #636efa;
    }

    .chart-grid {
      stroke: rgba(139, 148, 158, 0.2);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .table-wrap {
      overflow-x: auto;
    }

    table.grid {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.9rem;
    }

    table.grid th,
    table.grid td {
      border-bottom: 1px solid var(--border);
      padding: 6px 10px;
      text-align: left;
    }

    table.grid th {
      color: var(--muted);
      font-weight: 600;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 800px) {
      body {
        grid-template-columns: 1fr;
      }

      aside {
        border-right: none;
        border-bottom: 1px solid var(--border);
      }
    }
  </style>
</head>
<body>
  <aside>
    {{COUNTDOWN}}
    <hr />
    <section class="inventory">
      <h3>🔌 Inventario</h3>
      <form id="inv-form" method="post" action="/inventory">
        <label>Aparato
          <input type="text" name="aparato" value="" />
        </label>
        <label>Watts
          <input type="number" name="watts" min="1" step="1" value="{{DEFAULT_WATTS}}" />
        </label>
        <button type="submit">Registrar</button>
      </form>
    </section>
    {{INVENTORY}}
  </aside>

  <main>
    <header>
      <h1>🖥️ Energy-Logic: Analista Forense</h1>
    </header>

    {{MAIN}}
  </main>
</body>
</html>
"#;
