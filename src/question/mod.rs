//! Questions attached to playlist items, with their cycles and answers.

mod answer;
mod crud;
mod cycle;
mod details;
mod types;

pub use answer::{create_cycle_answer, delete_cycle_answer, fetch_cycle_answers, update_cycle_answer};
pub use crud::{
    create_item_question, delete_item_question, fetch_item_question, fetch_item_questions,
    update_item_question,
};
pub use cycle::{
    create_question_cycle, delete_question_cycle, fetch_question_cycles, load_question_cycles,
    update_question_cycle,
};
pub use details::fetch_question_with_details;
pub use types::{
    CycleAnswer, CycleAnswerPatch, CycleWithAnswers, ItemQuestion, ItemQuestionPatch,
    NewCycleAnswer, NewItemQuestion, NewQuestionCycle, QuestionCycle, QuestionCyclePatch,
    QuestionDetails, QuestionType,
};

#[cfg(test)]
#[path = "question_tests.rs"]
mod tests;
