use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::question::{AnswerOption, Difficulty, Question, QuestionError};

#[derive(Debug, Error)]
pub enum QuestionBankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid question at position {index}: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Source of the ordered question sequence for one play-through.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    async fn get_progressive_questions(&self) -> Result<Vec<Question>, QuestionBankError>;
}

/// Checks every question's invariants before a session may use the sequence.
pub fn validate_sequence(questions: &[Question]) -> Result<(), QuestionBankError> {
    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|source| QuestionBankError::InvalidQuestion { index, source })?;
    }
    Ok(())
}

/// Orders questions easy to hard, keeping the provider's order within a tier.
fn progressive(mut questions: Vec<Question>) -> Vec<Question> {
    questions.sort_by_key(|q| q.difficulty);
    questions
}

/// Questions loaded from a JSON array on disk, re-read at every session start.
pub struct FileQuestionBank {
    path: PathBuf,
}

impl FileQuestionBank {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionBank for FileQuestionBank {
    async fn get_progressive_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| QuestionBankError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let questions: Vec<Question> = serde_json::from_str(&raw)?;

        tracing::debug!(
            path = %self.path.display(),
            count = questions.len(),
            "Loaded question bank"
        );

        Ok(progressive(questions))
    }
}

/// The bundled whale trivia set.
#[derive(Debug, Clone, Default)]
pub struct BuiltinQuestionBank;

#[async_trait]
impl QuestionBank for BuiltinQuestionBank {
    async fn get_progressive_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        Ok(progressive(builtin_questions()))
    }
}

/// Fixed in-memory sequence, mostly for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionBank {
    questions: Vec<Question>,
}

impl StaticQuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionBank for StaticQuestionBank {
    async fn get_progressive_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        Ok(self.questions.clone())
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: u32,
    difficulty: Difficulty,
    category: &str,
    points: u32,
    time_limit: u32,
    question: &str,
    options: [&str; 4],
    correct: &str,
    hints: [&str; 3],
) -> Question {
    let [hint1, hint2, hint3] = hints.map(str::to_string);
    Question {
        id,
        question: question.to_string(),
        options: options.iter().map(|o| AnswerOption::parse(o)).collect(),
        correct_answer: correct.to_string(),
        difficulty,
        category: category.to_string(),
        points,
        time_limit,
        hint1,
        hint2,
        hint3,
    }
}

fn builtin_questions() -> Vec<Question> {
    use Difficulty::{Easy, Hard, Medium};

    vec![
        entry(
            1,
            Easy,
            "whale_basics",
            100,
            60,
            "What is a crypto \"whale\"?",
            [
                "A) A holder with a very large position",
                "B) A new blockchain protocol",
                "C) A type of mining rig",
                "D) A hardware wallet brand",
            ],
            "A",
            [
                "Think about the size of the animal.",
                "It describes a person or entity, not a technology.",
                "Their trades can move the market on their own.",
            ],
        ),
        entry(
            2,
            Easy,
            "famous_whales",
            100,
            60,
            "Which ENS name belongs to Ethereum's co-founder?",
            [
                "A) satoshi.eth",
                "B) vitalik.eth",
                "C) punk6529.eth",
                "D) gavin.eth",
            ],
            "B",
            [
                "He wrote the Ethereum whitepaper.",
                "His first name starts with V.",
                "Buterin.",
            ],
        ),
        entry(
            3,
            Easy,
            "nft_whales",
            100,
            45,
            "Punk6529 is best known as a collector of which NFT collection?",
            [
                "A) Bored Ape Yacht Club",
                "B) Azuki",
                "C) CryptoPunks",
                "D) Art Blocks",
            ],
            "C",
            [
                "The answer is in the name.",
                "One of the earliest NFT projects on Ethereum.",
                "10,000 pixel-art characters released by Larva Labs.",
            ],
        ),
        entry(
            4,
            Medium,
            "on_chain",
            150,
            45,
            "Which tool is most commonly used to trace a whale's transfers on Ethereum?",
            [
                "A) A block explorer such as Etherscan",
                "B) A centralized exchange order book",
                "C) A hardware wallet firmware log",
                "D) A DNS lookup",
            ],
            "A",
            [
                "Transfers are public on-chain.",
                "You paste an address into it.",
                "Its name ends in \"scan\".",
            ],
        ),
        entry(
            5,
            Medium,
            "defi",
            150,
            45,
            "A whale moving a large amount of ETH onto an exchange is often read as a signal of what?",
            [
                "A) An upcoming airdrop",
                "B) Possible selling pressure",
                "C) A network upgrade",
                "D) Lower gas fees",
            ],
            "B",
            [
                "Why would someone deposit to an exchange?",
                "Exchanges are where tokens get sold.",
                "Traders watch for supply hitting the market.",
            ],
        ),
        entry(
            6,
            Medium,
            "defi",
            200,
            40,
            "What does staking tokens usually do with them?",
            [
                "A) Burns them permanently",
                "B) Sends them to a random address",
                "C) Locks them to help secure a network for rewards",
                "D) Converts them to stablecoins",
            ],
            "C",
            [
                "Tokens are not destroyed.",
                "There is usually a yield involved.",
                "Validators do this in proof-of-stake.",
            ],
        ),
        entry(
            7,
            Hard,
            "on_chain",
            250,
            35,
            "What is the name for a bot that front-runs large pending whale swaps in the mempool?",
            [
                "A) Oracle bot",
                "B) MEV searcher",
                "C) Faucet bot",
                "D) Relayer",
            ],
            "B",
            [
                "It profits from transaction ordering.",
                "Three-letter acronym for extractable value.",
                "Maximal Extractable Value.",
            ],
        ),
        entry(
            8,
            Hard,
            "history",
            250,
            35,
            "Roughly how many BTC are attributed to Satoshi Nakamoto's early mining wallets?",
            [
                "A) About 10,000",
                "B) About 100,000",
                "C) About 1.1 million",
                "D) About 5 million",
            ],
            "C",
            [
                "It is the largest known single holder.",
                "More than a million.",
                "Just over one million, untouched since 2010.",
            ],
        ),
        entry(
            9,
            Hard,
            "defi",
            300,
            30,
            "Which mechanism lets a whale borrow millions within one transaction with no collateral?",
            [
                "A) Margin account",
                "B) Flash loan",
                "C) Yield vault",
                "D) Payment channel",
            ],
            "B",
            [
                "The loan must be repaid in the same transaction.",
                "It is named after how quickly it happens.",
                "Popularized by Aave and dYdX.",
            ],
        ),
        entry(
            10,
            Hard,
            "nft_whales",
            300,
            30,
            "What is \"wash trading\" in NFT markets?",
            [
                "A) Cleaning metadata of an NFT",
                "B) Burning unsold NFTs",
                "C) Trading an asset with yourself to fake volume",
                "D) Bridging NFTs across chains",
            ],
            "C",
            [
                "It makes activity look bigger than it is.",
                "Buyer and seller are secretly the same.",
                "The goal is inflated volume or rewards.",
            ],
        ),
    ]
}
