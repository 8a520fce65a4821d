//! Demo page served at `/`

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>dsdviz</title>
    <style>
        :root {
            --bg: #1a1a2e;
            --card: #16213e;
            --accent: #0f3460;
            --highlight: #e94560;
            --text: #eee;
            --muted: #888;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: 'SF Mono', 'Consolas', monospace;
            background: var(--bg);
            color: var(--text);
            min-height: 100vh;
            padding: 20px;
        }
        .container { max-width: 1400px; margin: 0 auto; }
        h1 {
            font-size: 1.5rem;
            margin-bottom: 20px;
            color: var(--highlight);
        }
        .input-section {
            background: var(--card);
            padding: 20px;
            border-radius: 12px;
            margin-bottom: 20px;
            display: flex;
            gap: 15px;
        }
        input {
            flex: 1;
            background: var(--bg);
            border: 1px solid var(--accent);
            border-radius: 8px;
            padding: 12px;
            color: var(--text);
            font-family: inherit;
            font-size: 1rem;
        }
        input:focus { outline: none; border-color: var(--highlight); }
        button {
            background: var(--highlight);
            color: white;
            border: none;
            padding: 12px 30px;
            border-radius: 8px;
            font-size: 1rem;
            cursor: pointer;
            font-weight: 600;
        }
        .results {
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 20px;
        }
        .panel {
            background: var(--card);
            border-radius: 12px;
            padding: 15px;
        }
        .panel h2 {
            font-size: 0.85rem;
            color: var(--muted);
            margin-bottom: 10px;
            text-transform: uppercase;
            letter-spacing: 1px;
        }
        pre {
            background: var(--bg);
            border-radius: 8px;
            padding: 15px;
            overflow: auto;
            max-height: 500px;
            font-size: 0.8rem;
            color: #7dd3fc;
        }
        #svg-container { grid-column: 1 / span 2; }
        #svg-container .rendered-svg { background: white; border-radius: 8px; }
        @media (max-width: 900px) {
            .results { grid-template-columns: 1fr; }
            #svg-container { grid-column: auto; }
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>dsdviz</h1>

        <div class="input-section">
            <input id="run-input" type="text" value="a b( c ) d( e + f )" placeholder="a( b c + d )">
            <button id="run-button">Run</button>
        </div>

        <div class="results">
            <div class="panel">
                <h2>Tokens</h2>
                <pre id="tokens-area"></pre>
            </div>
            <div class="panel">
                <h2>AST</h2>
                <pre id="ast-area"></pre>
            </div>
            <div class="panel" id="svg-container">
                <h2>Rendered</h2>
            </div>
        </div>
    </div>

    <script>
        const SVG_MARKER_CLASS = 'rendered-svg';

        let lastSubmitted = null;
        let latestSeq = 0;

        function updateTokens(tokens) {
            document.getElementById('tokens-area').textContent = JSON.stringify(tokens, null, 2);
        }

        function updateAst(ast) {
            document.getElementById('ast-area').textContent = JSON.stringify(ast, null, 2);
        }

        function updateSvg(svgMarkup) {
            const container = document.getElementById('svg-container');
            container.querySelectorAll('.' + SVG_MARKER_CLASS).forEach(el => el.remove());

            const graphic = document.createElement('div');
            graphic.innerHTML = svgMarkup;
            graphic.classList.add(SVG_MARKER_CLASS);
            container.appendChild(graphic);
        }

        async function submitNewInput() {
            const text = document.getElementById('run-input').value;
            if (text !== '' && text === lastSubmitted) {
                return;
            }

            const seq = ++latestSeq;
            try {
                const response = await fetch('/run?input=' + encodeURIComponent(text));
                if (!response.ok) {
                    throw new Error('HTTP ' + response.status + ': ' + await response.text());
                }
                const data = await response.json();
                if (seq !== latestSeq) {
                    return;
                }

                updateTokens(data.tokens);
                updateAst(data.ast);
                if (data.svg) {
                    updateSvg(data.svg);
                }
                lastSubmitted = text;
            } catch (err) {
                console.error(err);
            }
        }

        document.getElementById('run-button').addEventListener('click', submitNewInput);
        document.getElementById('run-input').addEventListener('keyup', submitNewInput);
        window.addEventListener('load', submitNewInput);
    </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_has_view_elements() {
        for id in ["run-input", "tokens-area", "ast-area", "svg-container"] {
            assert!(INDEX_HTML.contains(&format!("id=\"{id}\"")), "{id}");
        }
        assert!(INDEX_HTML.contains(crate::client::SVG_MARKER_CLASS));
    }
}
