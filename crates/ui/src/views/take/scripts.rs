/// One-second timer driving the elapsed label.
///
/// Elapsed time is recomputed from the start epoch on every tick instead of
/// being incremented, so it self-corrects across stalls. A window-global slot
/// guarantees a single interval: any previous one is cleared when the key
/// changes, the view unmounts, or the timer is deactivated for submission.
pub(super) fn attempt_timer_script(start_ms: i64, active: bool) -> String {
    format!(
        r#"(function() {{
                    const root = document.getElementById("take-root");
                    const state = window.__quizAttemptTimer || (window.__quizAttemptTimer = {{
                        startMs: 0,
                        id: null,
                    }});
                    if (!root) {{
                        if (state.id) {{
                            clearInterval(state.id);
                            state.id = null;
                        }}
                        state.startMs = 0;
                        return;
                    }}
                    const startMs = {start_ms};
                    const active = {active};
                    const label = document.getElementById("attempt-timer");
                    const render = () => {{
                        if (!label) return;
                        const elapsed = Math.max(0, Math.floor((Date.now() - startMs) / 1000));
                        const hours = Math.floor(elapsed / 3600);
                        const minutes = Math.floor((elapsed % 3600) / 60);
                        const seconds = elapsed % 60;
                        const pad = (value) => String(value).padStart(2, "0");
                        label.textContent = hours > 0
                            ? hours + ":" + pad(minutes) + ":" + pad(seconds)
                            : pad(minutes) + ":" + pad(seconds);
                    }};
                    if (state.startMs !== startMs) {{
                        if (state.id) {{
                            clearInterval(state.id);
                            state.id = null;
                        }}
                        state.startMs = startMs;
                    }}
                    if (!active) {{
                        if (state.id) {{
                            clearInterval(state.id);
                            state.id = null;
                        }}
                        return;
                    }}
                    render();
                    if (!state.id) {{
                        state.id = setInterval(() => {{
                            if (!document.getElementById("take-root")) {{
                                clearInterval(state.id);
                                state.id = null;
                                return;
                            }}
                            render();
                        }}, 1000);
                    }}
                }})();"#,
        start_ms = start_ms,
        active = active,
    )
}
