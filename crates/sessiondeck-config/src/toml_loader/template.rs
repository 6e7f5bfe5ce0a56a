//! Commented default config file content.

pub(super) fn default_config_toml() -> &'static str {
    r##"# SessionDeck Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[layout]
# delay_seconds = 2.0          # 0-30, pause between tab opens when applying a layout
# jitter_ms = 50               # 0-1000, random extra delay added to each pause
# auto_save = true             # persist changes to the tracked layout
# default_split_ratio = 0.5    # 0.2-0.8

[timing]
# bounds_debounce_ms = 50      # 0-1000
# auto_save_debounce_ms = 500  # 0-10000
# ratio_commit_debounce_ms = 500
# reattach_delays_ms = [200, 500]

[chrome]
# tab_strip_height = 36        # 0-200
# tab_strip_visible = true
# split_gap = 8                # 0-64
# window_width = 1280
# window_height = 800

[storage]
# layouts_file = "/path/to/tabLayouts.json"

[logging]
# level = "info"               # error, warn, info, debug, trace
"##
}
