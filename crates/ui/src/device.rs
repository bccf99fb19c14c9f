pub const MOBILE_BREAKPOINT_PX: u32 = 768;

const MOBILE_AGENT_TOKENS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Narrow viewports and mobile user agents both count as mobile.
pub fn is_mobile(viewport_width: Option<u32>, user_agent: Option<&str>) -> bool {
    let narrow = viewport_width.is_some_and(|width| width <= MOBILE_BREAKPOINT_PX);
    let mobile_agent = user_agent.is_some_and(|agent| {
        let agent = agent.to_ascii_lowercase();
        MOBILE_AGENT_TOKENS.iter().any(|token| agent.contains(token))
    });

    narrow || mobile_agent
}
