//! System directives sent with each extraction request.
//!
//! Retrieved context is appended to the directive; the user's query travels
//! separately as the user message.

/// Directive for job-listing extraction. The template it asks for is the one
/// [`parse_job_blocks`](crate::parser::parse_job_blocks) reads back.
pub const JOB_LISTINGS_DIRECTIVE: &str = "\
You are a helpful assistant who matches job seekers to relevant job listings.
Given the following context from job postings, extract only the top 3 most relevant job \
listings that match the following:
- User skills
- Preferred location (if given)
- Job involvement (e.g. full-time or part-time)
- Work type (e.g. remote, on-site, hybrid)

Only use the job information from the context. Do NOT invent job titles or details.

Format the output like:
1. **Job Title** at Company (Location)
   - Type: [Full-time/Part-time], [Remote/On-site/Hybrid]
   - Requirements: [...]
   - Description: ...

   - Contact information: (include only if available in the context)";

/// Directive for required-skill extraction.
pub const SKILLS_DIRECTIVE: &str = "\
You are a helpful assistant for extracting technical job skills from job descriptions.
Given the following context, extract and list the key required skills for the job title below.
- Use only the content in the context.
- Return a bullet-point list of skills only.
- Do NOT make up any skill not explicitly mentioned.";

/// Combine a directive with serialized context chunks into one system block.
pub fn system_instruction(directive: &str, context: &str) -> String {
    format!("{directive}\n\nContext:\n{context}")
}

/// The retrieval query used to look up a title's required skills.
pub fn skills_query(job_title: &str) -> String {
    format!("What are the required skills for a {}?", job_title.trim())
}
