use serde_json::{Value, json};

/// Suffix the model must append to every extracted line.
pub const LINE_SUFFIX: &str = " - com solicitação de diarias";

/// Name of the single field of the structured response.
pub const LINES_FIELD: &str = "extracted_lines";

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn system_instruction() -> String {
        format!(
            r#"Você é um assistente especializado em extração de dados administrativos de viagens e diárias.
Sua tarefa é analisar textos complexos e extrair as seguintes informações para CADA viagem mencionada:

1. DATA E LÓGICA DE HORÁRIOS: ESTA INFORMAÇÃO DEVE SER A PRIMEIRA DA LINHA.
   - SE as datas de saída e retorno forem IGUAIS: use o formato "DD/MM/AAAA, Cidade, saida: HH:mm, retorno: HH:mm".
   - SE as datas forem DIFERENTES: use o formato "saida: DD/MM/AAAA HH:mm, retorno: DD/MM/AAAA HH:mm, Cidade".

2. CIDADE DESTINO: identifique para onde o colaborador foi.

3. ATIVIDADE / MOTIVO DA DIÁRIA (REGRAS CRÍTICAS):
   - RETIRE obrigatoriamente a primeira sigla (ex: DETF, GAB, etc) e o hífen.
   - REMOVA obrigatoriamente qualquer conteúdo entre parênteses ().

REGRAS DE FORMATAÇÃO FINAL:
- Cada viagem em uma ÚNICA linha.
- Comece SEMPRE pela Data/Horário.
- Campos separados por VÍRGULA.
- Sufixo obrigatório: "{LINE_SUFFIX}"

Responda apenas com o objeto JSON no campo "{LINES_FIELD}", uma string por viagem."#
        )
    }

    /// Gemini `responseSchema`: an object with one required array of strings.
    pub fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                LINES_FIELD: {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }
            },
            "required": [LINES_FIELD]
        })
    }
}
