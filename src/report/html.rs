//! HTML report generation with D3.js visualizations

use crate::aggregate;
use crate::flatten::FlatRecord;
use crate::report::Summary;
use crate::taxonomy::Category;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, records: &[FlatRecord]) -> io::Result<()> {
    let summary = Summary::from_records(records);
    let json_data = build_json_data(records, &summary);

    let overall = {
        let present: Vec<f64> = summary.categories().iter().filter_map(|(_, v)| *v).collect();
        if present.is_empty() {
            "–".to_string()
        } else {
            format!("{:.1}", present.iter().sum::<f64>() / present.len() as f64)
        }
    };

    // Write the full HTML document
    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Screenroom Interview Report</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        :root {{
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --good: #3fb950;
            --mid: #d29922;
            --poor: #f85149;
            --accent: #58a6ff;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }}
        .container {{ max-width: 1600px; margin: 0 auto; padding: 2rem; }}

        /* Header */
        .header {{
            display: flex;
            align-items: center;
            gap: 1rem;
            margin-bottom: 2rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }}
        .logo {{
            font-size: 2.5rem;
            font-weight: 800;
            background: linear-gradient(135deg, var(--accent), #a371f7);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
        }}
        .subtitle {{ color: var(--dim); font-size: 1rem; }}

        /* Stats Row */
        .stats {{
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .stat {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
            text-align: center;
        }}
        .stat-value {{ font-size: 3rem; font-weight: 700; line-height: 1; }}
        .stat-label {{ color: var(--dim); font-size: 0.875rem; text-transform: uppercase; letter-spacing: 0.05em; margin-top: 0.5rem; }}
        .stat.overall .stat-value {{ color: var(--accent); }}

        /* Charts */
        .charts {{
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .chart-card {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
        }}
        .chart-title {{ font-weight: 600; margin-bottom: 1rem; }}
        .metric-charts {{
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .no-data {{ color: var(--dim); text-align: center; padding: 2rem 0; }}

        /* Table */
        .table-container {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            overflow-x: auto;
        }}
        table {{ width: 100%; border-collapse: collapse; font-size: 0.85rem; }}
        th {{
            text-align: left;
            padding: 0.75rem 1rem;
            color: var(--dim);
            font-size: 0.75rem;
            text-transform: uppercase;
            letter-spacing: 0.05em;
            border-bottom: 1px solid var(--border);
            white-space: nowrap;
        }}
        td {{ padding: 0.6rem 1rem; border-bottom: 1px solid rgba(48,54,61,0.5); white-space: nowrap; }}
        tr:last-child td {{ border-bottom: none; }}
        tr:hover td {{ background: rgba(255,255,255,0.02); }}

        .score {{ font-variant-numeric: tabular-nums; font-weight: 600; }}
        .score.good {{ color: var(--good); }}
        .score.mid {{ color: var(--mid); }}
        .score.poor {{ color: var(--poor); }}
        .score.none {{ color: var(--dim); font-weight: 400; }}
        .dim {{ color: var(--dim); }}

        /* Footer */
        .footer {{
            margin-top: 2rem;
            padding-top: 1rem;
            border-top: 1px solid var(--border);
            color: var(--dim);
            font-size: 0.875rem;
            text-align: center;
        }}
        .footer a {{ color: var(--accent); text-decoration: none; }}
        .footer a:hover {{ text-decoration: underline; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <div>
                <div class="logo">Screenroom</div>
                <div class="subtitle">Interview Analysis Report</div>
            </div>
        </div>

        <div class="stats">
            <div class="stat">
                <div class="stat-value">{total}</div>
                <div class="stat-label">Responses</div>
            </div>
            <div class="stat">
                <div class="stat-value">{candidates}</div>
                <div class="stat-label">Candidates</div>
            </div>
            <div class="stat">
                <div class="stat-value">{questions}</div>
                <div class="stat-label">Questions</div>
            </div>
            <div class="stat overall">
                <div class="stat-value">{overall}</div>
                <div class="stat-label">Overall Average</div>
            </div>
        </div>

        <div class="charts">
            <div class="chart-card">
                <div class="chart-title">Average Scores by Category</div>
                <div id="radar-chart"></div>
            </div>
            <div class="chart-card">
                <div class="chart-title">Category Averages</div>
                <div id="category-bars"></div>
            </div>
        </div>

        <div class="metric-charts" id="metric-charts"></div>

        <div class="table-container">
            <table>
                <thead>
                    <tr id="table-header"></tr>
                </thead>
                <tbody id="records-table"></tbody>
            </table>
        </div>

        <div class="footer">
            Generated by <a href="https://github.com/notactuallytreyanastasio/screenroom" target="_blank">Screenroom</a>
        </div>
    </div>

    <script>
    const data = {json_data};

    function scoreClass(value) {{
        if (value === null || value === undefined) return 'none';
        if (value >= 7) return 'good';
        if (value >= 4) return 'mid';
        return 'poor';
    }}

    function fmt(value) {{
        return value === null || value === undefined ? '–' : value.toFixed(1);
    }}

    // Radar: one polygon over the four category axes, 0-10 scale
    function drawRadar() {{
        const size = 320, radius = size / 2 - 50;
        const axes = data.categories;
        const angle = i => (Math.PI * 2 * i) / axes.length - Math.PI / 2;

        const svg = d3.select('#radar-chart')
            .append('svg')
            .attr('width', size)
            .attr('height', size)
            .append('g')
            .attr('transform', `translate(${{size / 2}},${{size / 2}})`);

        // Rings
        [2.5, 5, 7.5, 10].forEach(level => {{
            svg.append('circle')
                .attr('r', radius * level / 10)
                .attr('fill', 'none')
                .attr('stroke', '#30363d')
                .attr('stroke-dasharray', '3,3');
        }});

        // Axes and labels
        axes.forEach((axis, i) => {{
            const x = Math.cos(angle(i)) * radius;
            const y = Math.sin(angle(i)) * radius;
            svg.append('line')
                .attr('x1', 0).attr('y1', 0)
                .attr('x2', x).attr('y2', y)
                .attr('stroke', '#30363d');
            svg.append('text')
                .attr('x', x * 1.22).attr('y', y * 1.22)
                .attr('text-anchor', 'middle')
                .attr('dy', '0.35em')
                .style('fill', '#7d8590')
                .style('font-size', '0.8rem')
                .text(axis.name);
        }});

        const scored = axes.filter(a => a.value !== null);
        if (scored.length === 0) {{
            d3.select('#radar-chart').append('div').attr('class', 'no-data').text('No scored data');
            return;
        }}

        const points = axes.map((axis, i) => {{
            const v = axis.value === null ? 0 : axis.value;
            return [Math.cos(angle(i)) * radius * v / 10, Math.sin(angle(i)) * radius * v / 10];
        }});

        svg.append('polygon')
            .attr('points', points.map(p => p.join(',')).join(' '))
            .attr('fill', 'rgba(88,166,255,0.25)')
            .attr('stroke', '#58a6ff')
            .attr('stroke-width', 2);

        axes.forEach((axis, i) => {{
            if (axis.value === null) return;
            svg.append('circle')
                .attr('cx', points[i][0]).attr('cy', points[i][1])
                .attr('r', 4)
                .attr('fill', '#58a6ff');
        }});
    }}

    function drawBars(selector, items, height) {{
        const container = document.querySelector(selector);
        const margin = {{ top: 10, right: 20, bottom: 60, left: 40 }};
        const width = container.clientWidth - margin.left - margin.right;
        const innerHeight = height - margin.top - margin.bottom;

        if (items.every(d => d.value === null)) {{
            d3.select(selector).append('div').attr('class', 'no-data').text('No scored data');
            return;
        }}

        const svg = d3.select(selector)
            .append('svg')
            .attr('width', width + margin.left + margin.right)
            .attr('height', height)
            .append('g')
            .attr('transform', `translate(${{margin.left}},${{margin.top}})`);

        const x = d3.scaleBand()
            .domain(items.map(d => d.name))
            .range([0, width])
            .padding(0.25);

        const y = d3.scaleLinear().domain([0, 10]).range([innerHeight, 0]);

        svg.append('g')
            .call(d3.axisLeft(y).ticks(5))
            .style('color', '#7d8590');

        svg.append('g')
            .attr('transform', `translate(0,${{innerHeight}})`)
            .call(d3.axisBottom(x))
            .style('color', '#7d8590')
            .selectAll('text')
            .attr('transform', 'rotate(-30)')
            .style('text-anchor', 'end');

        svg.selectAll('.bar')
            .data(items.filter(d => d.value !== null))
            .enter()
            .append('rect')
            .attr('x', d => x(d.name))
            .attr('width', x.bandwidth())
            .attr('y', d => y(d.value))
            .attr('height', d => innerHeight - y(d.value))
            .attr('rx', 3)
            .attr('fill', d => d.value >= 7 ? '#3fb950' : d.value >= 4 ? '#d29922' : '#f85149');
    }}

    function drawMetricCharts() {{
        const container = d3.select('#metric-charts');
        data.breakdown.forEach((group, i) => {{
            const card = container.append('div').attr('class', 'chart-card');
            card.append('div').attr('class', 'chart-title').text(`${{group.category}} Metrics`);
            card.append('div').attr('id', `metric-chart-${{i}}`);
            drawBars(`#metric-chart-${{i}}`, group.metrics, 240);
        }});
    }}

    function buildTable() {{
        const header = document.getElementById('table-header');
        const columns = ['Candidate', 'Question', 'File'].concat(data.metricLabels);
        columns.forEach(c => {{
            const th = document.createElement('th');
            th.textContent = c;
            header.appendChild(th);
        }});

        const tbody = document.getElementById('records-table');
        data.records.forEach(r => {{
            const tr = document.createElement('tr');

            const name = document.createElement('td');
            name.textContent = `${{r.firstName || ''}} ${{r.lastName || ''}}`;
            tr.appendChild(name);

            const question = document.createElement('td');
            question.className = 'dim';
            question.textContent = r.question || '–';
            tr.appendChild(question);

            const file = document.createElement('td');
            file.className = 'dim';
            file.textContent = r.fileName || r.videoUrl || '–';
            tr.appendChild(file);

            data.metricColumns.forEach(c => {{
                const td = document.createElement('td');
                td.className = 'score ' + scoreClass(r[c]);
                td.textContent = fmt(r[c]);
                tr.appendChild(td);
            }});

            tbody.appendChild(tr);
        }});
    }}

    // Initialize
    drawRadar();
    drawBars('#category-bars', data.categories, 280);
    drawMetricCharts();
    buildTable();
    </script>
</body>
</html>
"#,
        total = summary.total,
        candidates = summary.candidates,
        questions = summary.questions,
        overall = overall,
        json_data = json_data
    )?;

    Ok(())
}

fn build_json_data(records: &[FlatRecord], summary: &Summary) -> String {
    let categories: Vec<serde_json::Value> = summary
        .categories()
        .iter()
        .map(|(name, value)| serde_json::json!({ "name": name, "value": value }))
        .collect();

    let breakdown: Vec<serde_json::Value> = Category::ALL
        .iter()
        .map(|category| {
            let metrics: Vec<serde_json::Value> = aggregate::metric_averages(records, *category)
                .iter()
                .map(|(m, value)| serde_json::json!({ "name": m.label(), "value": value }))
                .collect();
            serde_json::json!({ "category": category.name(), "metrics": metrics })
        })
        .collect();

    let metric_columns: Vec<&str> = Category::ALL
        .iter()
        .flat_map(|c| c.metrics().iter().map(|m| m.column()))
        .collect();
    let metric_labels: Vec<&str> = Category::ALL
        .iter()
        .flat_map(|c| c.metrics().iter().map(|m| m.label()))
        .collect();

    serde_json::json!({
        "summary": summary,
        "categories": categories,
        "breakdown": breakdown,
        "metricColumns": metric_columns,
        "metricLabels": metric_labels,
        "records": records,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // HTML REPORT TESTS
    // ==========================================================================
    //
    // The report is one self-contained document: embedded data, D3 from CDN,
    // chart containers, and the draw calls that fill them.
    // ==========================================================================

    fn render(records: &[FlatRecord]) -> String {
        let mut buf = Vec::new();
        write(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_contains_chart_containers() {
        let html = render(&[]);
        assert!(html.contains("radar-chart"));
        assert!(html.contains("category-bars"));
        assert!(html.contains("metric-charts"));
        assert!(html.contains("records-table"));
    }

    #[test]
    fn test_draw_calls_present() {
        let html = render(&[]);
        assert!(html.contains("drawRadar();"));
        assert!(html.contains("drawMetricCharts();"));
        assert!(html.contains("buildTable();"));
    }

    #[test]
    fn test_embeds_record_data() {
        let records = vec![FlatRecord {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            question: Some("Q1".to_string()),
            attire_score: Some(7.0),
            ..FlatRecord::default()
        }];
        let html = render(&records);
        assert!(html.contains(r#""firstName":"Jane""#));
        assert!(html.contains(r#""attire_score":7.0"#));
    }

    #[test]
    fn test_empty_table_shows_dash_overall() {
        let html = render(&[]);
        // Overall average tile falls back to a dash, not NaN
        assert!(html.contains(r#"<div class="stat-value">–</div>"#));
        assert!(!html.contains("NaN"));
    }
}
