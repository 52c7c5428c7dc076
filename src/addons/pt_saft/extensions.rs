use crate::cbc::{Definition, I18n};

use super::*;

pub(super) fn extensions() -> Vec<Definition> {
    vec![
        invoice_type(),
        work_type(),
        tax_rate(),
        product_type(),
        payment_means(),
        source(),
        Definition::key(EXT_KEY_SOURCE_REF, I18n::en("Source document reference").with("pt", "Referência do documento de origem"))
            .desc(I18n::en(
                "Reference of the original document for integrated and manually issued documents, \
                 such as `FTM abc/00001`.",
            )),
    ]
}

fn code(code: &str, en: &str, pt: &str) -> Definition {
    Definition::code(code, I18n::en(en).with("pt", pt))
}

fn invoice_type() -> Definition {
    Definition::key(EXT_KEY_INVOICE_TYPE, I18n::en("Invoice Type").with("pt", "Tipo de Fatura"))
        .desc(I18n::en(
            "SAF-T document type of a sales invoice, set from the invoice type and tags.",
        ))
        .values(vec![
            code(INVOICE_TYPE_STANDARD, "Standard Invoice", "Fatura"),
            code(INVOICE_TYPE_SIMPLIFIED, "Simplified Invoice", "Fatura Simplificada"),
            code(INVOICE_TYPE_INVOICE_RECEIPT, "Invoice-Receipt", "Fatura-Recibo"),
            code(INVOICE_TYPE_DEBIT_NOTE, "Debit Note", "Nota de Débito"),
            code(INVOICE_TYPE_CREDIT_NOTE, "Credit Note", "Nota de Crédito"),
        ])
}

fn work_type() -> Definition {
    Definition::key(EXT_KEY_WORK_TYPE, I18n::en("Work Document Type").with("pt", "Tipo de Documento de Conferência"))
        .values(vec![
            code(WORK_TYPE_PROFORMA, "Pro forma invoice", "Fatura pró-forma"),
            code(WORK_TYPE_CONSIGNMENT_INVOICE, "Consignment invoice", "Fatura de consignação"),
            code(WORK_TYPE_CONSIGNMENT_CREDIT, "Consignment credit note", "Nota de crédito de consignação"),
        ])
}

fn tax_rate() -> Definition {
    Definition::key(EXT_KEY_TAX_RATE, I18n::en("Tax Rate Code").with("pt", "Código da Taxa de Imposto"))
        .desc(I18n::en("Rate code reported for each VAT combo."))
        .values(vec![
            code(TAX_RATE_REDUCED, "Reduced", "Reduzida"),
            code(TAX_RATE_INTERMEDIATE, "Intermediate", "Intermédia"),
            code(TAX_RATE_NORMAL, "Normal", "Normal"),
            code(TAX_RATE_EXEMPT, "Exempt", "Isenta"),
            code(TAX_RATE_OTHER, "Other", "Outra"),
        ])
}

fn product_type() -> Definition {
    Definition::key(EXT_KEY_PRODUCT_TYPE, I18n::en("Product Type").with("pt", "Tipo de Produto"))
        .values(vec![
            code(PRODUCT_TYPE_GOODS, "Goods", "Produtos"),
            code(PRODUCT_TYPE_SERVICE, "Services", "Serviços"),
            code(PRODUCT_TYPE_OTHER, "Other", "Outros"),
            code(PRODUCT_TYPE_EXCISE, "Excise duties", "Impostos especiais de consumo"),
            code(PRODUCT_TYPE_FEE, "Taxes, fees and parafiscal charges", "Impostos, taxas e encargos parafiscais"),
        ])
}

fn payment_means() -> Definition {
    Definition::key(EXT_KEY_PAYMENT_MEANS, I18n::en("Payment Means").with("pt", "Meio de Pagamento"))
        .values(vec![
            code("CC", "Credit card", "Cartão de crédito"),
            code("CD", "Debit card", "Cartão de débito"),
            code("CH", "Bank cheque", "Cheque bancário"),
            code("CI", "International documentary credit", "Crédito documentário internacional"),
            code("CO", "Gift cheque or card", "Cheque ou cartão oferta"),
            code("CS", "Settlement of balances in current account", "Compensação de saldos em conta corrente"),
            code("DE", "Electronic money", "Dinheiro eletrónico"),
            code("LC", "Commercial bill", "Letra comercial"),
            code("MB", "Multibanco payment references", "Referências de pagamento para Multibanco"),
            code("NU", "Cash", "Numerário"),
            code("OU", "Other", "Outros meios aqui não assinalados"),
            code("PR", "Exchange of goods", "Permuta de bens"),
            code("TB", "Bank transfer", "Transferência bancária"),
            code("TR", "Non-wage compensation", "Títulos de compensação extrassalarial"),
        ])
}

fn source() -> Definition {
    Definition::key(EXT_KEY_SOURCE, I18n::en("Source Billing").with("pt", "Origem do Documento"))
        .values(vec![
            code(SOURCE_PRODUCED, "Produced in the billing system", "Produzido na aplicação"),
            code(SOURCE_INTEGRATED, "Integrated from another system", "Integrado de outra aplicação"),
            code(SOURCE_MANUAL, "Manually issued and recovered", "Recuperação ou emissão manual"),
        ])
}
