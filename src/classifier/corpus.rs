//! Synthetic labeled training corpus.
//!
//! A small fixed set of hand-written clean and defective exemplars plus
//! generated variations: deterministic template structure with randomly
//! chosen identifiers and fragments, driven by a seeded generator so
//! training is reproducible across process starts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generated clean/defective pairs appended to the fixed exemplars.
pub const GENERATED_PAIRS: usize = 20;

pub const LABEL_CLEAN: u8 = 0;
pub const LABEL_DEFECTIVE: u8 = 1;

#[derive(Debug, Clone)]
pub struct LabeledSample {
    pub code: String,
    pub label: u8,
}

const CLEAN_EXEMPLARS: &[&str] = &[
    r#"def calculate_sum(numbers: List[int]) -> int:
    '''Calculate the sum of numbers.'''
    if not numbers:
        return 0
    return sum(numbers)"#,
    r#"async def fetch_data(url: str) -> dict:
    '''Fetch data from URL with proper error handling.'''
    try:
        response = await client.get(url)
        response.raise_for_status()
        return response.json()
    except HTTPError as e:
        logger.error(f"HTTP error: {e}")
        raise"#,
    r#"class UserService:
    '''Service for user operations.'''

    def __init__(self, repository: UserRepository):
        self._repository = repository

    def get_user(self, user_id: int) -> Optional[User]:
        '''Get user by ID.'''
        return self._repository.find_by_id(user_id)"#,
];

const DEFECTIVE_EXEMPLARS: &[&str] = &[
    r#"def process(x):
    try:
        result = eval(x)
        exec(x)
    except:
        pass
    return result"#,
    r#"def login(user, pwd):
    password = "admin123"
    if pwd == password:
        global logged_in
        logged_in = True
    print("Login: " + pwd)"#,
    r#"def fetch(url):
    import os
    os.system("curl " + url)
    data = None
    if data == None:
        pass"#,
    r#"var x = 1;
eval(userInput);
document.innerHTML = data;
console.log(x);"#,
];

const CLEAN_NAMES: &[&str] = &["process", "calculate", "fetch", "handle", "validate"];
const CLEAN_PARAMS: &[&str] = &["data: dict", "items: list", "value: int", "name: str"];
const CLEAN_DOCS: &[&str] = &["Process the data.", "Calculate result.", "Handle operation."];
const DEFECTIVE_NAMES: &[&str] = &["process", "handle", "execute", "run"];

/// Build the full corpus: fixed exemplars first, then generated pairs.
pub fn synthetic_corpus(seed: u64) -> Vec<LabeledSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::new();

    for code in CLEAN_EXEMPLARS {
        samples.push(LabeledSample {
            code: (*code).to_string(),
            label: LABEL_CLEAN,
        });
    }
    for code in DEFECTIVE_EXEMPLARS {
        samples.push(LabeledSample {
            code: (*code).to_string(),
            label: LABEL_DEFECTIVE,
        });
    }

    for _ in 0..GENERATED_PAIRS {
        samples.push(generate_clean(&mut rng));
        samples.push(generate_defective(&mut rng));
    }

    samples
}

fn generate_clean(rng: &mut StdRng) -> LabeledSample {
    let name = pick(rng, CLEAN_NAMES);
    let params = pick(rng, CLEAN_PARAMS);
    let doc = pick(rng, CLEAN_DOCS);

    let code = match rng.gen_range(0..3) {
        0 => format!("def {name}({params}) -> dict:\n    '''{doc}'''\n    return result"),
        1 => format!("class {name}:\n    '''{doc}'''\n    def __init__(self):\n        pass"),
        _ => format!(
            "async def {name}():\n    '''{doc}'''\n    result = await operation()\n    return result"
        ),
    };

    LabeledSample {
        code,
        label: LABEL_CLEAN,
    }
}

fn generate_defective(rng: &mut StdRng) -> LabeledSample {
    let name = pick(rng, DEFECTIVE_NAMES);

    let code = match rng.gen_range(0..4) {
        0 => format!("def {name}():\n    try:\n        eval(input())\n    except:\n        pass"),
        1 => format!("var {name};\nconsole.log({name});\neval(data);"),
        2 => format!("def {name}(x):\n    global state\n    exec(x)\n    password = 'secret123'"),
        _ => format!("function {name}() {{\n    document.innerHTML = data;\n    eval(code);\n}}"),
    };

    LabeledSample {
        code,
        label: LABEL_DEFECTIVE,
    }
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_has_exemplars_plus_generated_pairs() {
        let samples = synthetic_corpus(1);
        assert_eq!(samples.len(), 3 + 4 + 2 * GENERATED_PAIRS);
    }

    #[test]
    fn both_labels_are_represented() {
        let samples = synthetic_corpus(1);
        let defective = samples.iter().filter(|s| s.label == LABEL_DEFECTIVE).count();
        let clean = samples.iter().filter(|s| s.label == LABEL_CLEAN).count();
        assert_eq!(defective, 4 + GENERATED_PAIRS);
        assert_eq!(clean, 3 + GENERATED_PAIRS);
    }

    #[test]
    fn same_seed_reproduces_the_corpus() {
        let first = synthetic_corpus(99);
        let second = synthetic_corpus(99);
        let first_codes: Vec<&str> = first.iter().map(|s| s.code.as_str()).collect();
        let second_codes: Vec<&str> = second.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(first_codes, second_codes);
    }

    #[test]
    fn different_seeds_vary_the_generated_tail() {
        let first = synthetic_corpus(1);
        let second = synthetic_corpus(2);
        let differs = first
            .iter()
            .zip(second.iter())
            .skip(7)
            .any(|(a, b)| a.code != b.code);
        assert!(differs);
    }
}
