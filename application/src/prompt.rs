use domain::conversation;
use domain::models::{ConversationMessage, RetrievedMatch};
use shared::types::Result;

pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant specializing in helping students find the best professors based on their queries. Your primary function is to analyze student questions, retrieve relevant information from a database of professor reviews, and provide recommendations for the top 3 professors that best match the student's needs.

Your capabilities include:
1. Understanding and interpreting student queries about professors, courses, and teaching styles.
2. Accessing and analyzing a comprehensive database of professor reviews and ratings.
3. Using Retrieval-Augmented Generation (RAG) to find the most relevant professor information based on the query.
4. Providing concise summaries of the top 3 recommended professors.
5. Offering additional context or explanations when needed.

For each user query:
1. Analyze the query to identify key requirements (e.g., subject area, teaching style, difficulty level).
2. Use RAG to retrieve relevant professor information from the review database.
3. Evaluate and rank professors based on how well they match the query.
4. Present the top 3 professors, including:
   - Name
   - Subject area
   - Overall rating (out of 5 stars)
   - A brief summary of strengths and any potential drawbacks
   - Relevant comments from reviews that address the student's query

5. Offer to provide more details or answer follow-up questions if needed.

Maintain a helpful and impartial tone, focusing on providing accurate and useful information to assist students in making informed decisions about their course selections.

If a query is unclear or lacks specific criteria, ask for clarification to ensure you provide the most relevant recommendations.

Your goal is to help students find professors who will best support their learning objectives and academic success.";

pub const CONTEXT_HEADER: &str = "\n\nReturned from vector db (done automatically): ";

/// Renders the retrieval results as the fixed-format context block appended
/// to the active user turn. Matches are rendered in the order given; ranking
/// is the index's job, not ours. With no matches the block is just the
/// header, which is a valid prompt.
pub fn render_matches(matches: &[RetrievedMatch]) -> String {
    let mut block = String::from(CONTEXT_HEADER);
    for m in matches {
        block.push_str(&format!(
            "\nProfessor: {}\nSubject: {}\nRating: {}\n",
            m.id,
            m.subject(),
            m.rating()
        ));
    }
    block
}

/// Pure composition of the augmented prompt: the fixed system instruction,
/// then the history verbatim, then the active user turn with the context
/// block appended. The original last message is replaced, never duplicated.
pub fn compose_prompt(
    messages: &[ConversationMessage],
    matches: &[RetrievedMatch],
) -> Result<Vec<ConversationMessage>> {
    let (history, last) = conversation::split_active(messages)?;
    let mut prompt = Vec::with_capacity(messages.len() + 1);
    prompt.push(ConversationMessage::system(SYSTEM_PROMPT));
    prompt.extend(history.iter().cloned());
    prompt.push(ConversationMessage::user(format!(
        "{}{}",
        last.content,
        render_matches(matches)
    )));
    Ok(prompt)
}
