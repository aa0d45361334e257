/// Static registration data the host reads before activating the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    /// Prefix under which the host namespaces this plugin's stored config.
    pub config_prefix: &'static str,
    pub order: u32,
    pub auth_level: u8,
}

pub const DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    name: "tmdbhook",
    description: "使用自建 TMDB 反代服务，锁定电影/剧集名称",
    icon: "tmdb.png",
    version: "1.0",
    author: "tmdbhook",
    config_prefix: "tmdbproxy_",
    order: 10,
    auth_level: 1,
};
