//! Plays rendered effects through the webview's Web Audio context.

use dioxus::document::eval;
use tokio::sync::mpsc::UnboundedReceiver;

use services::audio::RenderedSound;

const PLAYBACK_SCRIPT: &str = r#"
    const [rate, samples] = await dioxus.recv();
    const Ctx = window.AudioContext || window.webkitAudioContext;
    if (!Ctx || samples.length === 0) {
        return;
    }
    const ctx = window.__hudugaAudio || (window.__hudugaAudio = new Ctx());
    if (ctx.state === "suspended") {
        await ctx.resume();
    }
    const buffer = ctx.createBuffer(1, samples.length, rate);
    buffer.copyToChannel(Float32Array.from(samples), 0);
    const source = ctx.createBufferSource();
    source.buffer = buffer;
    source.connect(ctx.destination);
    source.start();
"#;

/// Forward every rendered effect to the webview until the sender closes.
pub async fn pump_sounds(mut sounds: UnboundedReceiver<RenderedSound>) {
    while let Some(sound) = sounds.recv().await {
        let playback = eval(PLAYBACK_SCRIPT);
        if let Err(err) = playback.send((sound.sample_rate, sound.samples.to_vec())) {
            tracing::warn!(event = ?sound.event, ?err, "webview refused a sound effect");
        }
    }
    tracing::debug!("sound output closed");
}
