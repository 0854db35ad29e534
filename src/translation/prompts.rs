/*!
 * Instruction prompt sent with every chunk.
 */

/// Fixed instruction asking for a bilingual (English + Chinese) subtitle file
pub const BILINGUAL_PROMPT: &str = "This is a partial subtitle file. Convert it into a bilingual version (English + Chinese).

Keep all English lines exactly as they are.
Add the Chinese translation directly under each English line.
For translation, you don't need to follow the English line breaks rigidly; merge or split as needed so the Chinese reads naturally.
The timing does not need to match every English phrase precisely; prioritize accurate and coherent meaning.
Reply ONLY with the updated subtitle file content. No explanations, no greetings.";

/// Compose the request input: instruction, blank line, chunk text
pub fn compose_prompt(chunk_text: &str) -> String {
    format!("{}\n\n{}", BILINGUAL_PROMPT, chunk_text)
}
