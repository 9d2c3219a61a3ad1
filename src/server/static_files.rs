//! The page served at `/`, with its stylesheet and script.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Onde estou?</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <link rel="stylesheet" href="/style.css">
</head>
<body>
    <h1>Onde estou?</h1>
    <div class="actions">
        <button id="btn-localizacao">📍 Obter Localização</button>
        <button id="btn-endereco">📌 Buscar Endereço</button>
    </div>
    <div id="resultado"></div>
    <div id="resultado2"></div>
    <div id="mapa"></div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="/app.js"></script>
</body>
</html>
"#;

pub const STYLE_CSS: &str = r#"body {
    font-family: system-ui, sans-serif;
    max-width: 760px;
    margin: 0 auto;
    padding: 1rem;
}

.actions button {
    font-size: 1rem;
    padding: 0.5rem 1rem;
    margin-right: 0.5rem;
    cursor: pointer;
}

#resultado, #resultado2 {
    margin: 1rem 0;
}

#mapa {
    height: 420px;
    border-radius: 8px;
}
"#;

/// Asks the device for its position, fills the regions from the API and
/// replays the server's map state on Leaflet.
pub const APP_JS: &str = r#"(function () {
    const mapa = L.map("mapa");
    const camadas = L.layerGroup().addTo(mapa);
    let revisao = -1;
    let tiles = 0;

    function desenhar(estado) {
        if (!estado || estado.revision === revisao) return;
        revisao = estado.revision;
        for (; tiles < estado.tile_layers.length; tiles++) {
            const t = estado.tile_layers[tiles];
            L.tileLayer(t.url, { attribution: t.attribution }).addTo(mapa);
        }
        mapa.setView([estado.center.lat, estado.center.lon], estado.zoom);
        camadas.clearLayers();
        for (const m of estado.markers) {
            const marcador = L.marker([m.position.lat, m.position.lon]).addTo(camadas);
            if (m.popup) {
                marcador.bindPopup(m.popup);
                if (m.popup_open) marcador.openPopup();
            }
        }
    }

    async function acionar(caminho, corpo) {
        const pedido = { method: "POST" };
        if (corpo !== undefined) {
            pedido.headers = { "Content-Type": "application/json" };
            pedido.body = JSON.stringify(corpo);
        }
        try {
            const resposta = await fetch(caminho, pedido);
            const dados = await resposta.json();
            document.getElementById(dados.region).innerHTML = dados.html;
            desenhar(dados.map);
        } catch (erro) {
            console.error("Falha ao chamar " + caminho, erro);
        }
    }

    function obterLocalizacao() {
        if (!navigator.geolocation) {
            acionar("/api/location", { supported: false });
            return;
        }
        navigator.geolocation.getCurrentPosition(
            (posicao) => acionar("/api/location", {
                lat: posicao.coords.latitude,
                lon: posicao.coords.longitude,
                accuracy: posicao.coords.accuracy,
            }),
            (erro) => acionar("/api/location", { code: erro.code }),
            { enableHighAccuracy: true, timeout: 10000, maximumAge: 0 }
        );
    }

    document.getElementById("btn-localizacao")
        .addEventListener("click", obterLocalizacao);
    document.getElementById("btn-endereco")
        .addEventListener("click", () => acionar("/api/address"));

    fetch("/api/map").then((r) => r.json()).then(desenhar);
})();
"#;
