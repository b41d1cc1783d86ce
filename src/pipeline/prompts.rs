//! 调研流程各阶段使用的提示词

pub const TOOL_EXTRACTION_SYSTEM: &str = "You are a tech researcher. Extract specific tool, library, platform, or service names from articles. \
Focus on actual products and tools that developers can use, not general concepts or features.";

pub fn tool_extraction_user(query: &str, content: &str) -> String {
    format!(
        "Query: {query}\n\
Article Content:\n{content}\n\n\
Extract a list of specific tool/service names mentioned in this content that are relevant to \"{query}\".\n\n\
Rules:\n\
- Only include actual product names, not generic terms\n\
- Focus on tools developers can directly use or implement\n\
- Include both open source and commercial options\n\
- Limit to the 5 most relevant results\n\
- Return just the tool names, one per line, no descriptions, no numbering\n\n\
Example format:\n\
Supabase\n\
PlanetScale\n\
Railway\n\
Appwrite\n\
Nhost"
    )
}

pub const TOOL_ANALYSIS_SYSTEM: &str = "You are analyzing developer tools and programming technologies. \
Focus on extracting information relevant to programmers and software developers. \
Pay special attention to programming languages, frameworks, APIs, SDKs, and development workflows.";

pub fn tool_analysis_user(company_name: &str, content: &str) -> String {
    format!(
        "Company/Tool: {company_name}\n\
Website Content:\n{content}\n\n\
Analyze this content from a developer's perspective and provide:\n\
- pricing_model: One of \"Free\", \"Freemium\", \"Paid\", \"Enterprise\", or \"Unknown\"\n\
- is_open_source: true if open source, false if proprietary, null if unclear\n\
- tech_stack: List of programming languages, frameworks, databases, APIs, or technologies supported/used\n\
- description: Brief 1-sentence description focusing on what this tool does for developers\n\
- api_available: true if REST API, GraphQL, SDK, or programmatic access is mentioned\n\
- language_support: List of programming languages explicitly supported (e.g., Python, JavaScript, Go)\n\
- integration_capabilities: List of tools/platforms it integrates with (e.g., GitHub, VS Code, Docker, AWS)\n\n\
Focus on developer-relevant features like APIs, SDKs, language support, integrations, and development workflows."
    )
}

pub const RECOMMENDATIONS_SYSTEM: &str = "You are a senior software engineer providing quick, concise tech recommendations. \
Keep responses brief and actionable - maximum 3-4 sentences total.";

pub fn recommendations_user(query: &str, company_data: &str) -> String {
    format!(
        "Developer Query: {query}\n\
Tools/Technologies Analyzed: {company_data}\n\n\
Provide a brief recommendation (3-4 sentences max) covering:\n\
- Which tool is best and why\n\
- Key cost/pricing consideration\n\
- Main technical advantage\n\n\
Be concise and direct - no long explanations needed."
    )
}
