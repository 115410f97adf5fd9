use nu_plugin::{serve_plugin, MsgPackSerializer};
use nu_plugin_trends::TrendsPlugin;

fn main() {
    serve_plugin(&TrendsPlugin, MsgPackSerializer {})
}
